use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nrbmeta",
    version,
    about = "Certify Sentinel-1 NRB source metadata from measurement facts"
)]
pub struct CliArgs {
    /// Input fact file in JSON (single file mode)
    #[arg(short, long)]
    pub facts: Option<PathBuf>,

    /// Output document path (single file mode)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input directory containing fact files (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output directory for certified documents (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Batch mode: continue with other products when one fails unexpectedly
    #[arg(long, default_value_t = false)]
    pub batch: bool,

    /// JSON file with certification parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip re-parsing and re-validating emitted documents
    #[arg(long, default_value_t = false)]
    pub no_self_check: bool,

    /// Write the violation report of a rejected product to this file (single file mode)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write <stem>.violations.json next to the output for rejected products (batch mode)
    #[arg(long, default_value_t = false)]
    pub write_reports: bool,

    /// Write a <stem>.stac.json STAC item next to every certified document
    #[arg(long, default_value_t = false)]
    pub stac: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
