//! Mutable element tree.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Each element keeps the ids of its children and a non-owning
//! back-reference to its parent, so a node can be detached without first
//! building a child-to-parent map.
//!
//! Character data follows the element/text/tail model: `text` is the data
//! before the first child element, `tail` is the data after the element's
//! end tag up to its next sibling. Comments and processing instructions are
//! not represented.

use crate::namespace::QName;

/// Index of an element inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A single attribute, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub text: Option<String>,
    pub tail: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(name: QName, parent: Option<NodeId>) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: None,
            tail: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &QName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| &attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: QName, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }
}

/// A namespace binding seen in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// `None` for the default namespace.
    pub prefix: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    declarations: Vec<NamespaceDecl>,
}

impl Document {
    /// Create a document holding only a root element.
    pub fn new(root: QName) -> Self {
        Self {
            nodes: vec![Element::new(root, None)],
            declarations: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The root element's name in `{uri}local` notation.
    pub fn root_tag(&self) -> String {
        self.element(self.root()).name.to_string()
    }

    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    pub fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Direct children of `id` whose name equals `name`, in document order.
    pub fn child_elements_named<'a>(
        &'a self,
        id: NodeId,
        name: &'a QName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| &self.element(child).name == name)
    }

    /// Append a new element as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, name: QName) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element::new(name, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Remove `child` from `parent`. Returns false when `child` is not a
    /// direct child of `parent`.
    ///
    /// The removed subtree stays in the arena but is no longer reachable from
    /// the root; its tail text goes with it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let siblings = &mut self.nodes[parent.0].children;
        let Some(position) = siblings.iter().position(|&id| id == child) else {
            return false;
        };
        siblings.remove(position);
        self.nodes[child.0].parent = None;
        true
    }

    /// Detach `id` from its parent through the back-reference.
    pub fn detach(&mut self, id: NodeId) -> bool {
        match self.parent(id) {
            Some(parent) => self.remove_child(parent, id),
            None => false,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &QName) -> Option<&str> {
        self.element(id).attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: QName, value: impl Into<String>) {
        self.element_mut(id).set_attribute(name, value);
    }

    /// Namespace bindings recorded while parsing, in first-seen order.
    pub fn declarations(&self) -> &[NamespaceDecl] {
        &self.declarations
    }

    pub(crate) fn add_declaration(&mut self, decl: NamespaceDecl) {
        if !self.declarations.contains(&decl) {
            self.declarations.push(decl);
        }
    }

    /// All elements reachable from the root, in document order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Re-indent the tree in place, one `space` per nesting level.
    ///
    /// Only whitespace-only `text`/`tail` of elements that have children is
    /// rewritten; text with content and the text of leaf elements are kept.
    pub fn indent(&mut self, space: &str) {
        if self.children(self.root()).is_empty() {
            return;
        }
        self.indent_children(self.root(), 0, space);
    }

    fn indent_children(&mut self, id: NodeId, level: usize, space: &str) {
        let child_indentation = format!("\n{}", space.repeat(level + 1));
        if is_blank(self.nodes[id.0].text.as_deref()) {
            self.nodes[id.0].text = Some(child_indentation.clone());
        }
        let children = self.nodes[id.0].children.clone();
        for &child in &children {
            if !self.nodes[child.0].children.is_empty() {
                self.indent_children(child, level + 1, space);
            }
            if is_blank(self.nodes[child.0].tail.as_deref()) {
                self.nodes[child.0].tail = Some(child_indentation.clone());
            }
        }
        if let Some(&last) = children.last()
            && is_blank(self.nodes[last.0].tail.as_deref())
        {
            self.nodes[last.0].tail = Some(format!("\n{}", space.repeat(level)));
        }
    }
}

fn is_blank(text: Option<&str>) -> bool {
    text.is_none_or(|value| value.trim().is_empty())
}
