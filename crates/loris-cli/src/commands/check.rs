use std::path::Path;

use miette::{miette, IntoDiagnostic, Result};

use loris_engine::first_violation;
use loris_io::corpus_files::{load_round, stem_path};
use loris_io::read_retained_file;
use loris_ir::conjunction::total_size;

/// Reload the corpus and `<stem>.R` and run the consistency oracle,
/// failing (nonzero exit) on any violation.
pub fn run_check_command(stem: &Path) -> Result<()> {
    let inputs = load_round(stem).into_diagnostic()?;
    let retained = read_retained_file(&stem_path(stem, "R")).into_diagnostic()?;

    if retained.len() != inputs.corpus.num_locations() {
        return Err(miette!(
            "retained set covers {} locations, corpus has {}",
            retained.len(),
            inputs.corpus.num_locations()
        ));
    }

    match first_violation(&retained, &inputs.corpus) {
        None => {
            println!(
                "consistent: {} locations, {} retained predicates",
                retained.len(),
                total_size(&retained)
            );
            Ok(())
        }
        Some(violation) => Err(miette!("inconsistent retained set: {violation}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loris_io::write_retained_file;
    use std::fs;

    #[test]
    fn check_accepts_a_consistent_file_and_rejects_a_broken_one() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("round");
        fs::write(stem_path(&stem, "attributes"), "cat $func\nint a\nint b\n").unwrap();
        fs::write(stem_path(&stem, "data"), "0 1 1 1\n0 0 1 0\n").unwrap();
        fs::write(stem_path(&stem, "horn"), "").unwrap();
        fs::write(stem_path(&stem, "intervals"), "0 1\n").unwrap();
        fs::write(stem_path(&stem, "status"), "1\n").unwrap();

        // Attribute 0 separates the negative: consistent.
        write_retained_file(&stem_path(&stem, "R"), &[[0].into_iter().collect()]).unwrap();
        run_check_command(&stem).unwrap();

        // The empty conjunction misclassifies the negative.
        write_retained_file(&stem_path(&stem, "R"), &[Default::default()]).unwrap();
        let err = run_check_command(&stem).unwrap_err();
        assert!(err.to_string().contains("inconsistent"));

        // Location-count mismatch is its own failure.
        write_retained_file(
            &stem_path(&stem, "R"),
            &[Default::default(), Default::default()],
        )
        .unwrap();
        assert!(run_check_command(&stem).is_err());
    }
}
