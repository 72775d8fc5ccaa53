use std::fs;
use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nrbmeta::{
    CertificationParams, ConstraintCatalog, Error, certify_to_path, process_directory_to_path,
};

use super::args::CliArgs;
use super::errors::AppError;

fn load_params(args: &CliArgs) -> Result<CertificationParams, AppError> {
    let mut params = match &args.config {
        Some(path) => CertificationParams::from_json_file(path)?,
        None => CertificationParams::default(),
    };
    if args.no_self_check {
        params.self_check = false;
    }
    if args.write_reports {
        params.write_report = true;
    }
    if args.stac {
        params.write_stac = true;
    }
    Ok(params)
}

fn certify_single_file(
    facts: &Path,
    output: &Path,
    report_path: Option<&Path>,
    catalog: &ConstraintCatalog,
    params: &CertificationParams,
) -> Result<(), AppError> {
    match certify_to_path(facts, output, catalog, params) {
        Ok(certified) => {
            for w in &certified.warnings {
                warn!("{}", w);
            }
            info!("Successfully certified: {:?} -> {:?}", facts, output);
            Ok(())
        }
        Err(Error::Rejected(report)) => {
            eprintln!("{}", report);
            if let Some(path) = report_path {
                fs::write(path, serde_json::to_string_pretty(&report).map_err(Error::from)?)?;
                info!("Violation report written to {:?}", path);
            }
            Err(AppError::Rejected {
                violations: report.failure_count(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let params = load_params(&args)?;
    let catalog = ConstraintCatalog::standard();
    let batch_mode = args.batch || args.input_dir.is_some();

    if batch_mode {
        let input_dir = args.input_dir.ok_or(AppError::MissingArgument {
            arg: "--input-dir".to_string(),
        })?;
        let output_dir = args.output_dir.ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        info!("Starting batch certification from directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let report =
            process_directory_to_path(&input_dir, &output_dir, catalog, &params, args.batch)?;

        println!(
            "processed={} rejected={} errors={}",
            report.processed, report.rejected, report.errors
        );
        if report.rejected > 0 || report.errors > 0 {
            return Err(AppError::BatchIncomplete {
                rejected: report.rejected,
                errors: report.errors,
            }
            .into());
        }
    } else {
        let facts = args.facts.ok_or(AppError::MissingArgument {
            arg: "--facts".to_string(),
        })?;
        let output = args.output.ok_or(AppError::MissingArgument {
            arg: "--output".to_string(),
        })?;

        certify_single_file(&facts, &output, args.report.as_deref(), catalog, &params)?;
    }

    Ok(())
}
