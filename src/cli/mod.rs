//! datasweep CLI
//!
//! Command-line front end for the cleaning pipeline: load a dataset, run the
//! requested operations, print the report, write the cleaned CSV.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::coerce::TypeCoercer;
use crate::correlation::correlation_matrix;
use crate::io::{DataLoader, DataSaver};
use crate::pipeline::{CleanOp, CleaningPipeline, CleaningReport, OperationSet};
use crate::profile::Profiler;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "datasweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clean tabular datasets: impute, dedupe, de-outlier, profile")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run cleaning operations and write the cleaned CSV
    Clean {
        /// Input data file (CSV, TSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Fill missing numeric values with the column mean
        #[arg(long)]
        fill_mean: bool,

        /// Fill missing categorical values with the column mode
        #[arg(long)]
        fill_mode: bool,

        /// Drop rows containing missing values
        #[arg(long)]
        drop_missing: bool,

        /// Remove exact duplicate rows
        #[arg(long)]
        drop_duplicates: bool,

        /// Remove outlier rows using IQR bounds
        #[arg(long)]
        drop_outliers: bool,

        /// Request every cleaning operation
        #[arg(long)]
        all: bool,

        /// Print the correlation matrix of the cleaned table
        #[arg(long)]
        correlate: bool,

        /// Print the report as JSON instead of styled text
        #[arg(long)]
        json: bool,
    },

    /// Profile a dataset without cleaning it
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the correlation matrix of a dataset
    Correlate {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

/// Option flags for the `clean` command, resolved into an [`OperationSet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanFlags {
    pub fill_mean: bool,
    pub fill_mode: bool,
    pub drop_missing: bool,
    pub drop_duplicates: bool,
    pub drop_outliers: bool,
    pub all: bool,
}

impl CleanFlags {
    pub fn to_operation_set(self) -> OperationSet {
        let mut ops = OperationSet::new();
        if self.fill_mean || self.all {
            ops = ops.with(CleanOp::FillMean);
        }
        if self.fill_mode || self.all {
            ops = ops.with(CleanOp::FillMode);
        }
        if self.drop_missing || self.all {
            ops = ops.with(CleanOp::DropMissing);
        }
        if self.drop_duplicates || self.all {
            ops = ops.with(CleanOp::RemoveDuplicates);
        }
        if self.drop_outliers || self.all {
            ops = ops.with(CleanOp::RemoveOutliers);
        }
        ops
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_clean(
    data: &Path,
    output: &Path,
    flags: CleanFlags,
    correlate: bool,
    json: bool,
) -> anyhow::Result<()> {
    if !json {
        section("Clean");
        step_run("Loading data");
    }
    let start = Instant::now();
    let df = DataLoader::load_auto(data)?;
    if !json {
        step_done(&format!(
            "{} rows × {} cols in {:?}",
            df.height(),
            df.width(),
            start.elapsed()
        ));
    }

    let ops = flags.to_operation_set();

    if !json {
        step_run("Cleaning");
    }
    let start = Instant::now();
    let mut result = CleaningPipeline::run(&df, &ops)?;
    if !json {
        step_done(&format!("{:?}", start.elapsed()));
    }

    if json {
        // Keep stdout a single JSON document even with --correlate.
        if correlate {
            result.report.correlation = Some(correlation_matrix(&result.table)?);
        }
        println!("{}", result.report.to_json()?);
    } else {
        print_report(&result.report);
        if correlate {
            let corr = correlation_matrix(&result.table)?;
            section("Correlation");
            println!("{}", corr.to_dataframe()?);
        }
    }

    if !json {
        step_run(&format!("Saving → {}", output.display()));
    }
    DataSaver::save_csv(&mut result.table, output)?;
    if !json {
        step_done(&format!(
            "{} rows × {} cols",
            result.table.height(),
            result.table.width()
        ));
        println!();
    }

    Ok(())
}

pub fn cmd_info(data: &Path, json: bool) -> anyhow::Result<()> {
    let df = DataLoader::load_auto(data)?;
    // Profile after coercion so reported types reflect temporal columns.
    let df = TypeCoercer::coerce(&df)?;
    let profile = Profiler::profile(&df)?;

    if json {
        println!("{}", profile.to_json()?);
        return Ok(());
    }

    section("Profile");
    println!(
        "  {:<24} {:<14} {:>10}",
        muted("Column"),
        muted("Type"),
        muted("Missing")
    );
    println!("  {}", dim(&"─".repeat(50)));
    for col in &profile.columns {
        println!(
            "  {:<24} {:<14} {:>10}",
            col.name,
            col.kind.to_string(),
            col.missing
        );
    }
    println!("  {}", dim(&"─".repeat(50)));
    println!(
        "  {:<24} {}",
        muted("Shape"),
        format!("{} rows × {} cols", profile.n_rows, profile.n_cols).white()
    );
    println!();

    Ok(())
}

pub fn cmd_correlate(data: &Path) -> anyhow::Result<()> {
    let df = DataLoader::load_auto(data)?;
    let corr = correlation_matrix(&df)?;

    section("Correlation");
    println!("{}", corr.to_dataframe()?);
    Ok(())
}

fn print_report(report: &CleaningReport) {
    section("Profile");
    println!(
        "  {:<24} {:<14} {:>10}",
        muted("Column"),
        muted("Type"),
        muted("Missing")
    );
    println!("  {}", dim(&"─".repeat(50)));
    for col in &report.profile.columns {
        println!(
            "  {:<24} {:<14} {:>10}",
            col.name,
            col.kind.to_string(),
            col.missing
        );
    }

    section("Result");
    println!("  {:<28} {}", muted("Rows in"), report.rows_in);
    println!("  {:<28} {}", muted("Rows out"), report.rows_out);
    println!(
        "  {:<28} {}",
        muted("Missing rows dropped"),
        report.missing_rows_dropped
    );
    println!(
        "  {:<28} {}",
        muted("Duplicates removed"),
        report.duplicates_removed
    );
    println!(
        "  {:<28} {}",
        muted("Outlier rows removed"),
        report.outliers_removed
    );
    for removal in &report.outlier_columns {
        println!(
            "    {:<26} {} {}",
            dim(&removal.column),
            removal.rows_removed,
            dim(&format!("[{:.3}, {:.3}]", removal.lower, removal.upper))
        );
    }
}
