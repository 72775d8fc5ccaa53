//! High-level API: certify measurement facts into NRB source metadata documents.
//!
//! Every entry point runs the same pipeline: build a record from facts,
//! validate it against the catalog, serialize it and (unless disabled)
//! self-check the document. A record that fails validation never reaches
//! the serializer; the caller gets [`Error::Rejected`] with the full report.
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::core::builder::{FactSet, RecordBuilder};
use crate::core::catalog::ConstraintCatalog;
use crate::core::params::CertificationParams;
use crate::core::validator::{Validation, ValidatedRecord, Validator};
use crate::error::{Error, Result};
use crate::io::load_facts;
use crate::io::writers::stac::STAC_SUFFIX;
use crate::io::writers::{to_checked_document, to_document, write_document, write_stac_item};

/// Outcome of a successful certification
#[derive(Debug, Clone)]
pub struct Certified {
    pub record: ValidatedRecord,
    /// The serialized document, byte-for-byte what gets written
    pub document: String,
    /// Facts the builder could not place
    pub warnings: Vec<String>,
}

/// Build, validate and serialize one product's facts
pub fn certify(
    facts: FactSet,
    catalog: &ConstraintCatalog,
    params: &CertificationParams,
) -> Result<Certified> {
    let mut builder = RecordBuilder::new(catalog);
    builder.extend(facts);
    let built = builder.finish().map_err(Error::Rejected)?;

    let record = match Validator::new(catalog).validate(built.record) {
        Validation::Valid(record) => record,
        Validation::Invalid(mut report) => {
            report.warnings = built.warnings;
            return Err(Error::Rejected(report));
        }
    };

    let document = if params.self_check {
        to_checked_document(&record, catalog)?
    } else {
        to_document(&record)?
    };

    Ok(Certified {
        record,
        document,
        warnings: built.warnings,
    })
}

/// Certify the facts in `facts_path` and write the document to `output_path`.
///
/// With `params.write_stac` the STAC item lands next to it as `<stem>.stac.json`.
pub fn certify_to_path(
    facts_path: &Path,
    output_path: &Path,
    catalog: &ConstraintCatalog,
    params: &CertificationParams,
) -> Result<Certified> {
    let facts = load_facts(facts_path)?;
    let certified = certify(facts, catalog, params)?;
    write_document(&certified.document, output_path)?;
    if params.write_stac {
        write_stac_item(&certified.record, output_path)?;
    }
    Ok(certified)
}

/// Batch processing report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    /// Products whose facts failed validation
    pub rejected: usize,
    pub errors: usize,
}

/// Return an iterator over the fact files (`*.json`) directly inside
/// `input_dir`, sorted by name. Violation reports and STAC items are not
/// fact files.
pub fn iterate_fact_files(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let is_report = path.file_name().is_some_and(|name| {
            let name = name.to_string_lossy();
            name.ends_with(".violations.json") || name.ends_with(STAC_SUFFIX)
        });
        if path.is_file() && is_json && !is_report {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

fn product_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "product".to_string())
}

/// Certify every fact file of `input_dir` into `output_dir` as `<stem>.xml`.
///
/// Products are independent and run in parallel. Rejected products are
/// counted (and get `<stem>.violations.json` when `params.write_report` is
/// set) without stopping the batch. Any other failure is counted too; if
/// `continue_on_error` is false, the first one in file order is returned
/// once the batch has run.
pub fn process_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    catalog: &ConstraintCatalog,
    params: &CertificationParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)?;

    let files: Vec<PathBuf> = iterate_fact_files(input_dir)?.collect();
    info!("Certifying {} fact files from {:?}", files.len(), input_dir);

    let outcomes: Vec<(PathBuf, Result<()>)> = files
        .into_par_iter()
        .map(|path| {
            let stem = product_stem(&path);
            let output_path = output_dir.join(format!("{}.xml", stem));
            let outcome = match certify_to_path(&path, &output_path, catalog, params) {
                Ok(_) => {
                    info!("Certified: {:?} -> {:?}", path, output_path);
                    Ok(())
                }
                Err(Error::Rejected(report)) if params.write_report => {
                    let report_path = output_dir.join(format!("{}.violations.json", stem));
                    serde_json::to_string_pretty(&report)
                        .map_err(Error::from)
                        .and_then(|json| write_document(&json, &report_path))
                        .and(Err(Error::Rejected(report)))
                }
                Err(e) => Err(e),
            };
            (path, outcome)
        })
        .collect();

    let mut report = BatchReport::default();
    let mut first_error = None;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(()) => report.processed += 1,
            Err(Error::Rejected(violations)) => {
                warn!(
                    "Rejected {:?}: {} violations",
                    path,
                    violations.failure_count()
                );
                report.rejected += 1;
            }
            Err(e) => {
                warn!("Error processing {:?}: {}", path, e);
                report.errors += 1;
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    info!(
        "Batch complete: processed={} rejected={} errors={}",
        report.processed, report.rejected, report.errors
    );

    match first_error {
        Some(e) if !continue_on_error => Err(e),
        _ => Ok(report),
    }
}
