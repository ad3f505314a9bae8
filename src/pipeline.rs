//! Cleaning pipeline orchestration
//!
//! Applies the requested operations in a fixed precedence order:
//! fill-mean, fill-mode, drop-missing, remove-duplicates, remove-outliers.

use crate::coerce::TypeCoercer;
use crate::correlation::CorrelationMatrix;
use crate::error::{Result, SweepError};
use crate::filter::RowFilter;
use crate::impute::{FillStrategy, Imputer};
use crate::outlier::{ColumnRemoval, OutlierRemover};
use crate::profile::{ColumnKind, Profiler, TableProfile};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Cleaning operation identifiers. Ordering of the variants is the fixed
/// precedence in which the pipeline applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CleanOp {
    FillMean,
    FillMode,
    DropMissing,
    RemoveDuplicates,
    RemoveOutliers,
}

impl CleanOp {
    pub fn name(&self) -> &'static str {
        match self {
            CleanOp::FillMean => "fill-mean",
            CleanOp::FillMode => "fill-mode",
            CleanOp::DropMissing => "drop-missing",
            CleanOp::RemoveDuplicates => "remove-duplicates",
            CleanOp::RemoveOutliers => "remove-outliers",
        }
    }
}

/// Immutable set of requested operations, supplied once per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationSet {
    ops: BTreeSet<CleanOp>,
}

impl OperationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, op: CleanOp) -> Self {
        self.ops.insert(op);
        self
    }

    pub fn contains(&self, op: CleanOp) -> bool {
        self.ops.contains(&op)
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Requested operations in application order.
    pub fn iter(&self) -> impl Iterator<Item = CleanOp> + '_ {
        self.ops.iter().copied()
    }
}

impl FromIterator<CleanOp> for OperationSet {
    fn from_iter<I: IntoIterator<Item = CleanOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

/// Numeric and textual report of one cleaning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    pub profile: TableProfile,
    pub missing_rows_dropped: usize,
    pub duplicates_removed: usize,
    pub outliers_removed: usize,
    pub outlier_columns: Vec<ColumnRemoval>,
    pub rows_in: usize,
    pub rows_out: usize,
    /// Correlation matrix of the cleaned table, attached on request so the
    /// JSON rendering stays a single document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationMatrix>,
}

impl CleaningReport {
    /// Pretty-printed JSON rendering of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Output of a pipeline run: the cleaned table plus its report.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub table: DataFrame,
    pub report: CleaningReport,
}

/// Orchestrates coercion, profiling, and the selected cleaning operations.
pub struct CleaningPipeline;

impl CleaningPipeline {
    /// Run the pipeline over a private copy of `df`. The caller's table is
    /// never mutated. Each requested operation either fully completes or the
    /// whole run fails.
    pub fn run(df: &DataFrame, ops: &OperationSet) -> Result<CleaningResult> {
        if df.width() == 0 {
            return Err(SweepError::Input("table has no columns".to_string()));
        }
        if df.height() == 0 {
            return Err(SweepError::Input("table has no rows".to_string()));
        }

        let rows_in = df.height();
        let mut table = normalize_numeric(df)?;
        table = TypeCoercer::coerce(&table)?;

        let profile = Profiler::profile(&table)?;
        let numeric: Vec<String> = profile
            .columns_of_kind(ColumnKind::Numeric)
            .into_iter()
            .map(String::from)
            .collect();
        let non_numeric: Vec<String> = profile
            .non_numeric_columns()
            .into_iter()
            .map(String::from)
            .collect();

        let mut missing_rows_dropped = 0;
        let mut duplicates_removed = 0;
        let mut outlier_columns: Vec<ColumnRemoval> = Vec::new();

        if ops.contains(CleanOp::FillMean) {
            let cols = as_strs(&numeric);
            if cols.is_empty() {
                return Err(SweepError::quality(
                    CleanOp::FillMean.name(),
                    "table has no numeric columns",
                ));
            }
            table = Imputer::new(FillStrategy::Mean).apply(&table, &cols)?;
        }

        if ops.contains(CleanOp::FillMode) {
            let cols = as_strs(&non_numeric);
            if cols.is_empty() {
                return Err(SweepError::quality(
                    CleanOp::FillMode.name(),
                    "table has no non-numeric columns",
                ));
            }
            table = Imputer::new(FillStrategy::Mode).apply(&table, &cols)?;
        }

        if ops.contains(CleanOp::DropMissing) {
            let (filtered, removed) = RowFilter::drop_missing(&table)?;
            table = filtered;
            missing_rows_dropped = removed;
        }

        if ops.contains(CleanOp::RemoveDuplicates) {
            let (filtered, removed) = RowFilter::remove_duplicates(&table)?;
            table = filtered;
            duplicates_removed = removed;
        }

        if ops.contains(CleanOp::RemoveOutliers) {
            if numeric.is_empty() {
                return Err(SweepError::quality(
                    CleanOp::RemoveOutliers.name(),
                    "table has no numeric columns",
                ));
            }
            let remover = OutlierRemover::new().with_columns(numeric.clone());
            let (filtered, removals) = remover.remove(&table)?;
            table = filtered;
            outlier_columns = removals;
        }

        let outliers_removed = outlier_columns.iter().map(|r| r.rows_removed).sum();
        let rows_out = table.height();
        info!(rows_in, rows_out, "cleaning run complete");

        Ok(CleaningResult {
            table,
            report: CleaningReport {
                profile,
                missing_rows_dropped,
                duplicates_removed,
                outliers_removed,
                outlier_columns,
                rows_in,
                rows_out,
                correlation: None,
            },
        })
    }
}

/// Cast numeric columns to Float64 and normalize NaN to null so "missing"
/// has a single representation for the rest of the run.
fn normalize_numeric(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    for name in &names {
        let col = result.column(name.as_str())?;
        if !col.dtype().is_primitive_numeric() {
            continue;
        }
        let casted = col
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|e| SweepError::Data(e.to_string()))?;
        let ca = casted.f64().map_err(|e| SweepError::Data(e.to_string()))?;
        let cleaned: Float64Chunked = ca
            .into_iter()
            .map(|opt| opt.filter(|v| !v.is_nan()))
            .collect();
        result.replace(name.as_str(), cleaned.with_name(casted.name().clone()).into_series())?;
    }

    Ok(result)
}

fn as_strs(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}
