mod report;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "provirs";
    pub const BIN_NAME: &str = "provirs";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Tools for analyzing proviral genome sequence collections: intactness classification and per-region score distribution reports.")
        .subcommand_required(true)
        .subcommand(report::cli::create_report_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // REPORT
        //
        Some((report::cli::REPORT_CMD, matches)) => {
            report::handlers::run_report(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
