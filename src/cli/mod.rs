pub mod cost_centers;
pub mod init;
pub mod report;
pub mod status;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::filters::ReportFilter;
use crate::render::Format;
use crate::reports::ReportKind;

#[derive(Parser)]
#[command(name = "tallyman", about = "Grouped back-office reports with subtotals, CSV export and print layouts.")]
pub struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure the reporting API and the current user.
    Init {
        /// Base URL of the reporting API, e.g. https://erp.example/api
        #[arg(long = "api-base")]
        api_base: Option<String>,
        /// Employee number of the current user
        #[arg(long = "employee-no")]
        employee_no: Option<String>,
        /// Company name printed on documents
        #[arg(long)]
        company: Option<String>,
        /// Currency label shown on reports (default: LKR)
        #[arg(long)]
        currency: Option<String>,
        /// Where exports are written (default: ~/Documents/tallyman/exports)
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
    },
    /// Show current settings.
    Status,
    /// List the cost centers the current user may report on.
    CostCenters,
    /// Fetch a report and render it.
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
        #[command(flatten)]
        filter: ReportFilter,
        /// Aggregate a saved JSON response instead of calling the API
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output format (default: from --output extension, else text)
        #[arg(long, value_enum)]
        format: Option<Format>,
        /// Output file; `-` for stdout (default: <export-dir>/<report>_<params>.<ext>)
        #[arg(long)]
        output: Option<String>,
    },
}
