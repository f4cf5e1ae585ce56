use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use provirs_core::HIV_ORFS;
use provirs_core::models::{DataSource, RegionRecord, SourceTables};
use provirs_core::store::RecordStore;
use provirs_dist::density::{DensityCurve, Histogram, bin_counts, estimate_density};
use provirs_dist::scores::{Metric, Selection, extract_scores, filter_by_intactness};
use provirs_dist::summary::{ScoreSummary, summarize};

const SEPARATOR: &str = "------------------------------------------";

#[derive(Serialize)]
struct ReportOutput {
    source: String,
    metric: String,
    select: String,
    outliers: f64,
    regions: Vec<RegionReport>,
}

#[derive(Serialize)]
struct RegionReport {
    region: String,
    populations: Vec<PopulationReport>,
}

#[derive(Serialize)]
struct PopulationReport {
    population: String,
    summary: ScoreSummary,
    histogram: Histogram,
    #[serde(skip_serializing_if = "Option::is_none")]
    density: Option<DensityCurve>,
}

/// Which populations a selection expands to, with the intactness filter
/// (if any) applied to each.
fn population_plan(select: Selection) -> Vec<(&'static str, Option<bool>)> {
    match select {
        Selection::Together => vec![("all", None)],
        Selection::Intact => vec![("intact", Some(true))],
        Selection::Nonintact => vec![("nonintact", Some(false))],
        Selection::Separately => vec![("intact", Some(true)), ("nonintact", Some(false))],
    }
}

fn build_population(
    records: &[RegionRecord],
    region: &str,
    metric: Metric,
    population: &'static str,
    want_intact: Option<bool>,
    outliers: f64,
    bins: usize,
) -> Result<PopulationReport> {
    let scores = match want_intact {
        Some(flag) => extract_scores(
            region,
            metric,
            filter_by_intactness(flag, records, metric),
        )?,
        None => extract_scores(region, metric, records)?,
    };
    let trimmed = scores.trim(outliers);

    let summary = summarize(&trimmed.scores);
    let histogram = bin_counts(&trimmed.scores, bins, trimmed.range());
    // degenerate populations simply get no curve
    let density = estimate_density(&trimmed.scores).map(|mut curve| {
        curve.scale_to_counts(histogram.max_count(), histogram.bin_width());
        curve
    });

    Ok(PopulationReport {
        population: population.to_string(),
        summary,
        histogram,
        density,
    })
}

fn render_statistics(report: &RegionReport, select: Selection) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    match select {
        Selection::Separately => {
            writeln!(out, "Intact:").unwrap();
            writeln!(out, "Name: {}", report.region).unwrap();
            writeln!(out, "{}", report.populations[0].summary).unwrap();
            writeln!(out).unwrap();
            writeln!(out, "Nonintact:").unwrap();
            writeln!(out, "Name: {}", report.region).unwrap();
            writeln!(out, "{}", report.populations[1].summary).unwrap();
        }
        _ => {
            writeln!(out, "Name: {}", report.region).unwrap();
            writeln!(out, "{}", report.populations[0].summary).unwrap();
        }
    }
    writeln!(out, "{}", SEPARATOR).unwrap();
    out
}

pub fn run_report(matches: &ArgMatches) -> Result<()> {
    let source: DataSource = matches.get_one::<String>("source").unwrap().parse()?;
    let metric: Metric = matches.get_one::<String>("metric").unwrap().parse()?;
    let select: Selection = matches.get_one::<String>("select").unwrap().parse()?;

    let outliers: f64 = matches
        .get_one::<String>("outliers")
        .unwrap()
        .parse()
        .context("--outliers must be a number")?;
    if !(0.0..0.5).contains(&outliers) {
        bail!("--outliers must be in [0, 0.5), got {}", outliers);
    }

    let bins: usize = matches
        .get_one::<String>("bins")
        .unwrap()
        .parse()
        .context("--bins must be a positive integer")?;
    if bins == 0 {
        bail!("--bins must be a positive integer, got 0");
    }

    let regions: Vec<String> = match matches.get_many::<String>("region") {
        Some(values) => values.cloned().collect(),
        None => HIV_ORFS.iter().map(|orf| orf.to_string()).collect(),
    };

    let data_dir = matches.get_one::<String>("data-dir").unwrap();
    let regions_table = matches.get_one::<String>("regions-table");
    let defects_table = matches.get_one::<String>("defects-table");
    let output_path = matches.get_one::<String>("output");

    // --- Configure the record store ---
    let mut store = RecordStore::from_output_dir(data_dir);
    match (regions_table, defects_table) {
        (Some(regions_path), defects_path) => {
            let mut tables = SourceTables::new(regions_path);
            if let Some(defects_path) = defects_path {
                tables = tables.with_defects(defects_path);
            }
            store.register(source, tables);
        }
        (None, Some(_)) => bail!("--defects-table requires --regions-table"),
        (None, None) => {}
    }

    let records = store
        .get_joined(source)
        .with_context(|| format!("Failed to load records for source {}", source))?;

    // --- Sweep the regions ---
    let plan = population_plan(select);

    let progress = output_path.map(|_| {
        let pb = ProgressBar::new(regions.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap(),
        );
        pb.set_message("Summarizing regions");
        pb
    });

    let mut reports = Vec::with_capacity(regions.len());
    for region in &regions {
        let mut populations = Vec::with_capacity(plan.len());
        for (population, want_intact) in &plan {
            populations.push(build_population(
                records,
                region,
                metric,
                population,
                *want_intact,
                outliers,
                bins,
            )?);
        }
        reports.push(RegionReport {
            region: region.clone(),
            populations,
        });
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = &progress {
        pb.finish_with_message("Report complete");
    }

    // --- Emit ---
    match output_path {
        Some(path) => {
            let output = ReportOutput {
                source: source.to_string(),
                metric: metric.to_string(),
                select: select.to_string(),
                outliers,
                regions: reports,
            };
            let json = serde_json::to_string_pretty(&output)
                .context("Failed to serialize report to JSON")?;
            let mut file = File::create(Path::new(path))
                .with_context(|| format!("Failed to create output file: {}", path))?;
            file.write_all(json.as_bytes())?;
            eprintln!("Report written to {}", path);
        }
        None => {
            for report in &reports {
                print!("{}", render_statistics(report, select));
            }
        }
    }

    Ok(())
}
