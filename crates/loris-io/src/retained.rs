//! Persistence of per-location retained predicate sets.
//!
//! One line per location: the sentinel `e` for the empty conjunction, else
//! the retained attribute indices space-separated in ascending order. Blank
//! lines are skipped on read; the location count is implicit in the line
//! count and must be matched against the corpus by the caller.

use std::fs;
use std::path::Path;

use loris_ir::Conjunction;

use crate::error::FileError;

/// Render the retained sets in the flat line format.
pub fn render_retained(retained: &[Conjunction]) -> String {
    let mut out = String::new();
    for conjunction in retained {
        if conjunction.is_empty() {
            out.push('e');
        } else {
            for (i, a) in conjunction.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&a.to_string());
            }
        }
        out.push('\n');
    }
    out
}

/// Parse the flat line format back into retained sets.
pub fn parse_retained(input: &str, path: &Path) -> Result<Vec<Conjunction>, FileError> {
    let mut retained = Vec::new();
    for (line, record) in input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
    {
        if record == "e" {
            retained.push(Conjunction::new());
            continue;
        }
        let mut conjunction = Conjunction::new();
        for field in record.split_whitespace() {
            let attribute = field.parse().map_err(|_| {
                FileError::parse(path, line, format!("bad attribute index '{field}'"))
            })?;
            conjunction.insert(attribute);
        }
        retained.push(conjunction);
    }
    Ok(retained)
}

pub fn write_retained_file(path: &Path, retained: &[Conjunction]) -> Result<(), FileError> {
    fs::write(path, render_retained(retained)).map_err(|source| FileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_retained_file(path: &Path) -> Result<Vec<Conjunction>, FileError> {
    let input = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_retained(&input, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conj(indices: &[usize]) -> Conjunction {
        indices.iter().copied().collect()
    }

    #[test]
    fn renders_empty_sets_as_sentinel() {
        let rendered = render_retained(&[conj(&[]), conj(&[2, 0, 7]), conj(&[])]);
        assert_eq!(rendered, "e\n0 2 7\ne\n");
    }

    #[test]
    fn parses_sentinels_and_indices() {
        let retained = parse_retained("e\n0 2 7\n\ne\n", Path::new("test.R")).unwrap();
        assert_eq!(retained, vec![conj(&[]), conj(&[0, 2, 7]), conj(&[])]);
    }

    #[test]
    fn rejects_non_numeric_indices() {
        let err = parse_retained("0 x\n", Path::new("test.R")).unwrap_err();
        assert!(err.to_string().contains("bad attribute index 'x'"));
    }

    #[test]
    fn duplicate_indices_collapse() {
        let retained = parse_retained("3 3 3\n", Path::new("test.R")).unwrap();
        assert_eq!(retained, vec![conj(&[3])]);
    }
}
