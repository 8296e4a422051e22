pub mod check;
pub mod learn;
pub mod show;

use miette::{miette, Result};

use loris_ir::{AttributeCatalog, AttributeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse_output_format(raw: &str) -> Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(miette!("unknown output format '{other}' (expected text or json)")),
    }
}

/// Attribute name for display; indices without a catalog entry fall back to
/// a positional label.
pub fn predicate_label(catalog: &AttributeCatalog, attribute: AttributeId) -> String {
    catalog
        .predicate_name(attribute)
        .map(str::to_string)
        .unwrap_or_else(|| format!("p{attribute}"))
}
