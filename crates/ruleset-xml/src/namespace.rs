//! Namespace-qualified names.
//!
//! Names are rendered in Clark notation, `{uri}local`, the same form used to
//! look up and create elements inside one namespace.

use std::fmt;

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Return the namespace URI of a `{uri}local` tag, or `""` when the tag is
/// not qualified.
pub fn namespace_uri(tag: &str) -> &str {
    tag.strip_prefix('{')
        .and_then(|rest| rest.rfind('}').map(|end| &rest[..end]))
        .unwrap_or("")
}

/// An element or attribute name with an optional namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    namespace: Option<String>,
    local: String,
}

impl QName {
    /// Create a name in `namespace`; an empty namespace means unqualified.
    pub fn new(namespace: &str, local: impl Into<String>) -> Self {
        Self {
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            local: local.into(),
        }
    }

    /// Create an unqualified name.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Parse a name in `{uri}local` notation. Anything else is unqualified.
    pub fn from_clark(tag: &str) -> Self {
        let namespace = namespace_uri(tag);
        if tag.starts_with('{')
            && let Some(end) = tag.rfind('}')
        {
            return Self::new(namespace, &tag[end + 1..]);
        }
        Self::unqualified(tag)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(uri) => write!(f, "{{{uri}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}
