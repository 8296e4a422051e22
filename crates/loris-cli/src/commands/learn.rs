use std::fs;
use std::path::{Path, PathBuf};

use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use tracing::info;

use loris_engine::classify::{self, Perceptron, Winnow};
use loris_engine::{
    horndini, is_consistent, reduce_all, reduce_first, reduce_greedy, reduce_minimal, EngineError,
};
use loris_io::corpus_files::{load_round, stem_path};
use loris_io::{read_retained_file, write_retained_file};
use loris_ir::conjunction::total_size;
use loris_ir::{AttributeCatalog, Conjunction, Corpus};

use super::{predicate_label, OutputFormat};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Classifier training never needs this many epochs on a separable sample;
/// hitting the cap means the round's labels are contradictory.
const CLASSIFIER_EPOCHS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Horndini,
    SorcarAll,
    SorcarFirst,
    SorcarGreedy,
    SorcarMinimal,
    Winnow,
    Perceptron,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Horndini => "horndini",
            Algorithm::SorcarAll => "sorcar",
            Algorithm::SorcarFirst => "sorcar-first",
            Algorithm::SorcarGreedy => "sorcar-greedy",
            Algorithm::SorcarMinimal => "sorcar-minimal",
            Algorithm::Winnow => "winnow",
            Algorithm::Perceptron => "perceptron",
        }
    }
}

pub fn parse_algorithm(raw: &str) -> Result<Algorithm> {
    match raw {
        "horndini" => Ok(Algorithm::Horndini),
        "sorcar" => Ok(Algorithm::SorcarAll),
        "sorcar-first" => Ok(Algorithm::SorcarFirst),
        "sorcar-greedy" => Ok(Algorithm::SorcarGreedy),
        "sorcar-minimal" => Ok(Algorithm::SorcarMinimal),
        "winnow" => Ok(Algorithm::Winnow),
        "perceptron" => Ok(Algorithm::Perceptron),
        other => Err(miette!(
            "unknown algorithm '{other}' (expected horndini, sorcar, sorcar-first, \
             sorcar-greedy, sorcar-minimal, winnow or perceptron)"
        )),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LearnOptions {
    pub algorithm: Algorithm,
    pub reset_retained: bool,
    pub horndini_first: bool,
    pub alternate: bool,
    pub sorcar_ice: bool,
}

#[derive(Serialize)]
pub struct RoundReport {
    pub schema_version: u32,
    pub stem: String,
    pub algorithm: String,
    pub round: u32,
    /// Whether a reduction ran (as opposed to passing the maximal
    /// conjunction through unreduced).
    pub ran_reduction: bool,
    /// Whether `<stem>.R` was rewritten this round.
    pub wrote_retained: bool,
    pub locations: Vec<LocationReport>,
    pub total_retained: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifiers: Option<Vec<ClassifierReport>>,
}

#[derive(Serialize)]
pub struct LocationReport {
    pub location: usize,
    pub superset_size: usize,
    pub retained_size: usize,
    pub predicates: Vec<String>,
}

#[derive(Serialize)]
pub struct ClassifierReport {
    pub location: usize,
    pub threshold: f32,
    pub bias: f32,
    pub weights: Vec<f32>,
}

pub fn run_learn_command(
    stem: &Path,
    options: &LearnOptions,
    format: OutputFormat,
    report_out: Option<PathBuf>,
) -> Result<()> {
    let inputs = load_round(stem).into_diagnostic()?;
    let corpus = &inputs.corpus;
    info!(
        round = inputs.round,
        algorithm = options.algorithm.as_str(),
        datapoints = corpus.datapoints.len(),
        constraints = corpus.constraints.len(),
        "starting learning round"
    );

    let superset = horndini(corpus).into_diagnostic()?;
    debug_assert!(is_consistent(&superset, corpus));

    let mut classifiers = None;
    let (retained, ran_reduction, wrote_retained) = match options.algorithm {
        Algorithm::Horndini => {
            let retained = superset.clone();
            write_retained_file(&stem_path(stem, "R"), &retained).into_diagnostic()?;
            (retained, false, true)
        }

        Algorithm::SorcarAll
        | Algorithm::SorcarFirst
        | Algorithm::SorcarGreedy
        | Algorithm::SorcarMinimal => {
            let skip = (options.horndini_first && inputs.round == 1)
                || (options.alternate && inputs.round % 2 == 1);
            let (retained, ran) = if skip {
                (superset.clone(), false)
            } else {
                let mut retained = carried_retained(stem, options, inputs.round, corpus)?;
                reduction_of(options.algorithm)(corpus, &superset, &mut retained)
                    .into_diagnostic()?;
                (retained, true)
            };
            write_retained_file(&stem_path(stem, "R"), &retained).into_diagnostic()?;
            (retained, ran, true)
        }

        Algorithm::Winnow | Algorithm::Perceptron => {
            // The guiding conjunction labels the unclassified datapoints:
            // the maximal superset, or a freshly reduced retained set.
            let (guide, reduced) = if options.sorcar_ice {
                let mut retained = carried_retained(stem, options, inputs.round, corpus)?;
                reduce_all(corpus, &superset, &mut retained).into_diagnostic()?;
                write_retained_file(&stem_path(stem, "R"), &retained).into_diagnostic()?;
                (retained, true)
            } else {
                (superset.clone(), false)
            };
            classifiers = Some(match options.algorithm {
                Algorithm::Winnow => {
                    let models = classify::train_winnow(corpus, &guide, CLASSIFIER_EPOCHS)
                        .into_diagnostic()?;
                    winnow_reports(&models)
                }
                _ => {
                    let models = classify::train_perceptron(corpus, &guide, CLASSIFIER_EPOCHS)
                        .into_diagnostic()?;
                    perceptron_reports(&models)
                }
            });
            (guide, reduced, reduced)
        }
    };

    let report = build_report(stem, options, inputs.round, &inputs.catalog, &superset, &retained, ran_reduction, wrote_retained, classifiers);
    info!(
        total_retained = report.total_retained,
        ran_reduction, "learning round finished"
    );

    match format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).into_diagnostic()?
            );
        }
    }
    if let Some(path) = report_out {
        let rendered = serde_json::to_string_pretty(&report).into_diagnostic()?;
        fs::write(&path, rendered).into_diagnostic()?;
    }
    Ok(())
}

type Reduction = fn(&Corpus, &[Conjunction], &mut [Conjunction]) -> Result<(), EngineError>;

fn reduction_of(algorithm: Algorithm) -> Reduction {
    match algorithm {
        Algorithm::SorcarFirst => reduce_first,
        Algorithm::SorcarGreedy => reduce_greedy,
        Algorithm::SorcarMinimal => reduce_minimal,
        _ => reduce_all,
    }
}

/// The retained set carried over from the previous round: empty on the
/// first round or on `--reset-retained`, else read from `<stem>.R`.
fn carried_retained(
    stem: &Path,
    options: &LearnOptions,
    round: u32,
    corpus: &Corpus,
) -> Result<Vec<Conjunction>> {
    if options.reset_retained || round == 1 {
        Ok(vec![Conjunction::new(); corpus.num_locations()])
    } else {
        read_retained_file(&stem_path(stem, "R")).into_diagnostic()
    }
}

#[allow(clippy::too_many_arguments)]
fn build_report(
    stem: &Path,
    options: &LearnOptions,
    round: u32,
    catalog: &AttributeCatalog,
    superset: &[Conjunction],
    retained: &[Conjunction],
    ran_reduction: bool,
    wrote_retained: bool,
    classifiers: Option<Vec<ClassifierReport>>,
) -> RoundReport {
    let locations = retained
        .iter()
        .enumerate()
        .map(|(location, conjunction)| LocationReport {
            location,
            superset_size: superset[location].len(),
            retained_size: conjunction.len(),
            predicates: conjunction
                .iter()
                .map(|&a| predicate_label(catalog, a))
                .collect(),
        })
        .collect();
    RoundReport {
        schema_version: REPORT_SCHEMA_VERSION,
        stem: stem.display().to_string(),
        algorithm: options.algorithm.as_str().to_string(),
        round,
        ran_reduction,
        wrote_retained,
        locations,
        total_retained: total_size(retained),
        classifiers,
    }
}

fn winnow_reports(models: &[Winnow]) -> Vec<ClassifierReport> {
    models
        .iter()
        .enumerate()
        .map(|(location, model)| ClassifierReport {
            location,
            threshold: model.threshold,
            bias: 0.0,
            weights: model.weights.clone(),
        })
        .collect()
}

fn perceptron_reports(models: &[Perceptron]) -> Vec<ClassifierReport> {
    models
        .iter()
        .enumerate()
        .map(|(location, model)| ClassifierReport {
            location,
            threshold: model.threshold,
            bias: model.weights[0],
            weights: model.weights[1..].to_vec(),
        })
        .collect()
}

fn render_text(report: &RoundReport) -> String {
    let mut out = format!(
        "round {}: {}{}\n",
        report.round,
        report.algorithm,
        if report.ran_reduction {
            ""
        } else {
            " (no reduction this round)"
        }
    );
    for loc in &report.locations {
        let formula = if loc.predicates.is_empty() {
            "true".to_string()
        } else {
            loc.predicates.join(" ∧ ")
        };
        out.push_str(&format!(
            "location {}: {}/{} retained: {}\n",
            loc.location, loc.retained_size, loc.superset_size, formula
        ));
    }
    out.push_str(&format!("total retained predicates: {}\n", report.total_retained));
    if let Some(classifiers) = &report.classifiers {
        for c in classifiers {
            out.push_str(&format!(
                "classifier @{}: threshold {}, bias {}, weights {:?}\n",
                c.location, c.threshold, c.bias, c.weights
            ));
        }
    }
    out
}
