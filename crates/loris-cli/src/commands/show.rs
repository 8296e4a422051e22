use std::path::Path;

use miette::{IntoDiagnostic, Result};

use loris_io::corpus_files::{read_attributes_file, stem_path};
use loris_io::read_retained_file;

use super::predicate_label;

/// Print the persisted retained sets with attribute names; the empty
/// conjunction prints as `true`.
pub fn run_show_command(stem: &Path) -> Result<()> {
    let catalog = read_attributes_file(&stem_path(stem, "attributes")).into_diagnostic()?;
    let retained = read_retained_file(&stem_path(stem, "R")).into_diagnostic()?;

    for (location, conjunction) in retained.iter().enumerate() {
        let formula = if conjunction.is_empty() {
            "true".to_string()
        } else {
            conjunction
                .iter()
                .map(|&a| predicate_label(&catalog, a))
                .collect::<Vec<_>>()
                .join(" ∧ ")
        };
        println!("location {location} ({}): {formula}", catalog.location_attribute);
    }
    Ok(())
}
