mod cli;
mod client;
mod collate;
mod error;
mod filters;
mod fmt;
mod grouping;
mod hierarchy;
mod models;
mod normalize;
mod render;
mod reports;
mod settings;
mod sheet;
mod trial_balance;
mod view;

use clap::Parser;
use log::LevelFilter;

use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init {
            api_base,
            employee_no,
            company,
            currency,
            export_dir,
        } => cli::init::run(api_base, employee_no, company, currency, export_dir),
        Commands::Status => cli::status::run(),
        Commands::CostCenters => cli::cost_centers::run(),
        Commands::Report {
            kind,
            filter,
            input,
            format,
            output,
        } => cli::report::run(kind, filter, input, format, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
