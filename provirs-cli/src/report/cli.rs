use clap::{Arg, ArgAction, Command, arg};

pub const REPORT_CMD: &str = "report";

pub fn create_report_cli() -> Command {
    Command::new(REPORT_CMD)
        .about("Summarize per-region score distributions for a proviral sequence collection.")
        .arg(
            arg!(--source <SOURCE>)
                .required(false)
                .default_value("cfeintact/plasma")
                .help("Data source: los-alamos/plasma, cfeintact/plasma, or cfeintact/all"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .required(false)
                .default_value("output")
                .help("Directory holding the conventional table layout"),
        )
        .arg(
            Arg::new("regions-table")
                .long("regions-table")
                .required(false)
                .help("Path to a measurement table (overrides the conventional layout)"),
        )
        .arg(
            Arg::new("defects-table")
                .long("defects-table")
                .required(false)
                .help("Path to a defect table for the measurement table (requires --regions-table)"),
        )
        .arg(
            arg!(--metric <METRIC>)
                .required(false)
                .default_value("distance")
                .help("Score to extract: distance, size, \"size (protein)\", or \"indel impact\""),
        )
        .arg(
            arg!(--select <SELECT>)
                .required(false)
                .default_value("together")
                .help("Population to report: intact, nonintact, together, or separately"),
        )
        .arg(
            arg!(--outliers <FRACTION>)
                .required(false)
                .default_value("0.01")
                .help("Fraction of scores trimmed from each tail, in [0, 0.5)"),
        )
        .arg(
            arg!(--region <REGION>)
                .required(false)
                .action(ArgAction::Append)
                .help("Region to report on, repeatable (default: every HIV ORF)"),
        )
        .arg(
            arg!(--bins <BINS>)
                .required(false)
                .default_value("30")
                .help("Number of histogram bins"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: print statistics to stdout)"),
        )
}
