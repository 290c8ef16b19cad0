use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use ruleset_core::{GenerateReport, GeneratorConfig, SourceTree, category_ref, generate};

use crate::cli::{GenerateArgs, SourcesArgs};
use crate::summary::{new_table, right_align};

/// Built-in configuration unless a file is given.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("load configuration {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateReport> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    config.validate().context("validate configuration")?;

    let tree = match &args.source_dir {
        Some(dir) => SourceTree::local(dir).context("open source directory")?,
        None => SourceTree::clone_shallow(&config.source).context("fetch category documents")?,
    };
    info!(
        root = %tree.root().display(),
        documents = config.source.documents.len(),
        "source ready"
    );
    let report = generate(&tree, &config).context("generate ruleset")?;
    // The checkout, if any, is removed here.
    drop(tree);
    Ok(report)
}

pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    println!("Repository: {}", config.source.repository);
    println!("Revision: {}", config.source.revision);
    println!("Output: {}", config.output.path.display());

    let mut table = new_table(&["#", "Document", "Reference"]);
    right_align(&mut table, &[0]);
    for (index, document) in config.source.documents.iter().enumerate() {
        let reference =
            category_ref(Path::new(document)).unwrap_or_else(|err| format!("error: {err}"));
        table.add_row(vec![(index + 1).to_string(), document.clone(), reference]);
    }
    println!("{table}");
    Ok(())
}
