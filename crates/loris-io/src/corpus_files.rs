//! Readers for the five flat input files of one learning round.
//!
//! All formats are whitespace-separated text with one record per line and
//! blank lines ignored:
//!
//! - `<stem>.attributes`: `cat <name>` (the location discriminator, at
//!   most once) and `int <name>` lines, one predicate per line in global
//!   index order
//! - `<stem>.data`: `<location> <v0> .. <vk> <label>` with `0`/`1` values
//!   and a `1`/`0`/`?` label
//! - `<stem>.horn`: `<p0> <p1> .. => <c>` with datapoint indices, `_` for
//!   a missing conclusion
//! - `<stem>.intervals`: `<lo> <hi>` per location, inclusive
//! - `<stem>.status`: the 1-based round counter

use std::fs;
use std::path::{Path, PathBuf};

use loris_ir::{
    AttributeCatalog, AttributeInterval, Corpus, Datapoint, DatapointId, HornConstraint,
};

use crate::error::FileError;

/// Everything a learning round consumes, loaded and cross-validated.
#[derive(Debug, Clone)]
pub struct RoundInputs {
    pub catalog: AttributeCatalog,
    pub corpus: Corpus,
    pub round: u32,
}

/// `<stem>.<ext>`, preserving any dots already in the stem.
pub fn stem_path(stem: &Path, ext: &str) -> PathBuf {
    PathBuf::from(format!("{}.{ext}", stem.display()))
}

fn read_file(path: &Path) -> Result<String, FileError> {
    fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Non-blank lines with their 1-based line numbers.
fn records(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

pub fn parse_attributes(input: &str, path: &Path) -> Result<AttributeCatalog, FileError> {
    let mut catalog = AttributeCatalog::default();
    for (line, record) in records(input) {
        let (kind, name) = match record.split_once(char::is_whitespace) {
            Some((kind, name)) if !name.trim().is_empty() => (kind, name.trim()),
            _ => return Err(FileError::parse(path, line, "expected `cat <name>` or `int <name>`")),
        };
        match kind {
            "cat" => {
                if !catalog.location_attribute.is_empty() {
                    return Err(FileError::parse(
                        path,
                        line,
                        "more than one categorical attribute",
                    ));
                }
                catalog.location_attribute = name.to_string();
            }
            "int" => {
                if !catalog.predicates.insert(name.to_string()) {
                    return Err(FileError::parse(
                        path,
                        line,
                        format!("duplicate attribute name '{name}'"),
                    ));
                }
            }
            other => {
                return Err(FileError::parse(
                    path,
                    line,
                    format!("unknown attribute kind '{other}'"),
                ))
            }
        }
    }
    if catalog.is_empty() {
        return Err(FileError::parse(path, 1, "no attributes defined"));
    }
    Ok(catalog)
}

pub fn parse_data(input: &str, path: &Path) -> Result<Vec<Datapoint>, FileError> {
    let mut datapoints = Vec::new();
    for (line, record) in records(input) {
        let fields: Vec<&str> = record.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(FileError::parse(
                path,
                line,
                "expected `<location> <values..> <label>`",
            ));
        }
        let location: usize = fields[0]
            .parse()
            .map_err(|_| FileError::parse(path, line, format!("bad location '{}'", fields[0])))?;
        let label = match fields[fields.len() - 1] {
            "1" => Some(true),
            "0" => Some(false),
            "?" => None,
            other => {
                return Err(FileError::parse(
                    path,
                    line,
                    format!("bad label '{other}' (expected 0, 1 or ?)"),
                ))
            }
        };
        let mut values = Vec::with_capacity(fields.len() - 2);
        for field in &fields[1..fields.len() - 1] {
            values.push(match *field {
                "1" => true,
                "0" => false,
                other => {
                    return Err(FileError::parse(
                        path,
                        line,
                        format!("bad value '{other}' (expected 0 or 1)"),
                    ))
                }
            });
        }
        datapoints.push(Datapoint {
            location,
            values,
            label,
        });
    }
    Ok(datapoints)
}

pub fn parse_horn(input: &str, path: &Path) -> Result<Vec<HornConstraint>, FileError> {
    let mut constraints = Vec::new();
    for (line, record) in records(input) {
        let fields: Vec<&str> = record.split_whitespace().collect();
        let arrow = fields
            .iter()
            .position(|&f| f == "=>")
            .ok_or_else(|| FileError::parse(path, line, "expected `<premises..> => <conclusion>`"))?;
        if arrow + 2 != fields.len() {
            return Err(FileError::parse(
                path,
                line,
                "expected exactly one conclusion after `=>`",
            ));
        }
        let mut premises: Vec<DatapointId> = Vec::with_capacity(arrow);
        for field in &fields[..arrow] {
            premises.push(field.parse().map_err(|_| {
                FileError::parse(path, line, format!("bad premise index '{field}'"))
            })?);
        }
        let conclusion = match fields[arrow + 1] {
            "_" => None,
            field => Some(field.parse().map_err(|_| {
                FileError::parse(path, line, format!("bad conclusion index '{field}'"))
            })?),
        };
        constraints.push(HornConstraint::new(premises, conclusion));
    }
    Ok(constraints)
}

pub fn parse_intervals(input: &str, path: &Path) -> Result<Vec<AttributeInterval>, FileError> {
    let mut intervals = Vec::new();
    for (line, record) in records(input) {
        let fields: Vec<&str> = record.split_whitespace().collect();
        let (lo, hi) = match fields[..] {
            [lo, hi] => (
                lo.parse::<usize>()
                    .map_err(|_| FileError::parse(path, line, format!("bad bound '{lo}'")))?,
                hi.parse::<usize>()
                    .map_err(|_| FileError::parse(path, line, format!("bad bound '{hi}'")))?,
            ),
            _ => return Err(FileError::parse(path, line, "expected `<lo> <hi>`")),
        };
        // Interval sanity (lo <= hi) is the corpus validator's concern.
        intervals.push(AttributeInterval { lo, hi });
    }
    Ok(intervals)
}

pub fn parse_status(input: &str, path: &Path) -> Result<u32, FileError> {
    match records(input).next() {
        Some((line, record)) => record
            .parse()
            .map_err(|_| FileError::parse(path, line, format!("bad round counter '{record}'"))),
        None => Err(FileError::parse(path, 1, "missing round counter")),
    }
}

pub fn read_attributes_file(path: &Path) -> Result<AttributeCatalog, FileError> {
    parse_attributes(&read_file(path)?, path)
}

pub fn read_data_file(path: &Path) -> Result<Vec<Datapoint>, FileError> {
    parse_data(&read_file(path)?, path)
}

pub fn read_horn_file(path: &Path) -> Result<Vec<HornConstraint>, FileError> {
    parse_horn(&read_file(path)?, path)
}

pub fn read_intervals_file(path: &Path) -> Result<Vec<AttributeInterval>, FileError> {
    parse_intervals(&read_file(path)?, path)
}

pub fn read_status_file(path: &Path) -> Result<u32, FileError> {
    parse_status(&read_file(path)?, path)
}

/// Load and cross-validate every input file for one round.
pub fn load_round(stem: &Path) -> Result<RoundInputs, FileError> {
    let catalog = read_attributes_file(&stem_path(stem, "attributes"))?;
    let intervals = read_intervals_file(&stem_path(stem, "intervals"))?;
    let datapoints = read_data_file(&stem_path(stem, "data"))?;
    let constraints = read_horn_file(&stem_path(stem, "horn"))?;
    let round = read_status_file(&stem_path(stem, "status"))?;

    let corpus = Corpus::new(datapoints, constraints, intervals);
    let defects = corpus.validate();
    if !defects.is_empty() {
        return Err(FileError::Malformed {
            defects: defects.iter().map(ToString::to_string).collect(),
        });
    }

    Ok(RoundInputs {
        catalog,
        corpus,
        round,
    })
}
