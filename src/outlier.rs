//! IQR-based outlier row removal
//!
//! Columns are processed one at a time in table order, and each column's
//! quartiles are computed on the table as already filtered by the columns
//! before it. Bounds for later columns therefore reflect rows removed for
//! earlier ones; this cumulative behavior is part of the contract.

use crate::error::{Result, SweepError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rows removed for one column's bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRemoval {
    pub column: String,
    pub rows_removed: usize,
    pub lower: f64,
    pub upper: f64,
}

/// Sequential IQR outlier remover
#[derive(Debug, Clone)]
pub struct OutlierRemover {
    factor: f64,
    columns: Option<Vec<String>>,
}

impl OutlierRemover {
    pub fn new() -> Self {
        Self {
            factor: 1.5,
            columns: None,
        }
    }

    /// Restrict processing to specific columns (still in the given order).
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Remove outlier rows, returning the filtered table and per-column
    /// removal records.
    pub fn remove(&self, df: &DataFrame) -> Result<(DataFrame, Vec<ColumnRemoval>)> {
        let columns: Vec<String> = match &self.columns {
            Some(cols) => cols.clone(),
            None => df
                .get_columns()
                .iter()
                .filter(|c| c.dtype().is_primitive_numeric())
                .map(|c| c.name().to_string())
                .collect(),
        };

        let mut current = df.clone();
        let mut removals = Vec::with_capacity(columns.len());

        for name in &columns {
            let col = current
                .column(name.as_str())
                .map_err(|_| SweepError::ColumnNotFound(name.clone()))?;
            let casted = col
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| SweepError::Data(e.to_string()))?;
            let ca = casted.f64().map_err(|e| SweepError::Data(e.to_string()))?;

            // NaN counts as missing: it is excluded from the quartiles here
            // and fails the bound check below.
            let mut values: Vec<f64> = ca
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan())
                .collect();
            if values.is_empty() {
                debug!(column = %name, "no non-missing values, outlier pass skipped");
                continue;
            }
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let q1 = quantile_linear(&values, 0.25);
            let q3 = quantile_linear(&values, 0.75);
            let iqr = q3 - q1;
            let lower = q1 - self.factor * iqr;
            let upper = q3 + self.factor * iqr;

            // Missing values fail the bound check and are removed with the
            // outliers, matching the comparison semantics of the report
            // consumers downstream.
            let keep: Vec<bool> = ca
                .into_iter()
                .map(|opt| opt.map(|v| v >= lower && v <= upper).unwrap_or(false))
                .collect();

            let mask = BooleanChunked::from_slice("keep".into(), &keep);
            let before = current.height();
            current = current
                .filter(&mask)
                .map_err(|e| SweepError::Data(e.to_string()))?;
            let rows_removed = before - current.height();

            debug!(column = %name, lower, upper, rows_removed, "outlier pass");
            removals.push(ColumnRemoval {
                column: name.clone(),
                rows_removed,
                lower,
                upper,
            });
        }

        Ok((current, removals))
    }
}

impl Default for OutlierRemover {
    fn default() -> Self {
        Self::new()
    }
}

/// Quantile with linear interpolation between the two nearest order
/// statistics. `sorted` must be ascending and non-empty.
fn quantile_linear(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
