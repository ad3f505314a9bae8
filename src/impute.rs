//! Missing value imputation
//!
//! Mean fill for numeric columns, mode fill for everything else. Each
//! strategy touches exactly the columns it is handed and leaves the rest of
//! the table untouched.

use crate::error::{Result, SweepError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for filling missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillStrategy {
    /// Arithmetic mean of the non-missing values (numeric columns)
    Mean,
    /// Most frequent non-missing value, ties broken by first occurrence
    /// in column order (non-numeric columns)
    Mode,
}

impl FillStrategy {
    fn operation_name(&self) -> &'static str {
        match self {
            FillStrategy::Mean => "fill-mean",
            FillStrategy::Mode => "fill-mode",
        }
    }
}

/// Imputer for missing values
#[derive(Debug, Clone)]
pub struct Imputer {
    strategy: FillStrategy,
}

impl Imputer {
    pub fn new(strategy: FillStrategy) -> Self {
        Self { strategy }
    }

    /// Fill missing values in the named columns, returning a new table.
    ///
    /// A target column with zero non-missing values fails the run: there is
    /// no valid fill value and silently producing one would defeat cleaning.
    pub fn apply(&self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        let mut result = df.clone();

        for name in columns {
            let col = result
                .column(name)
                .map_err(|_| SweepError::ColumnNotFound(name.to_string()))?;
            let series = col.as_materialized_series().clone();

            if series.null_count() == 0 {
                continue;
            }

            let filled = match self.strategy {
                FillStrategy::Mean => self.fill_mean(&series)?,
                FillStrategy::Mode => self.fill_mode(&series)?,
            };
            result.replace(name, filled)?;
        }

        Ok(result)
    }

    fn fill_mean(&self, series: &Series) -> Result<Series> {
        let casted = series
            .cast(&DataType::Float64)
            .map_err(|e| SweepError::Data(e.to_string()))?;
        let ca = casted.f64().map_err(|e| SweepError::Data(e.to_string()))?;

        let mean = ca.mean().ok_or_else(|| {
            SweepError::quality(
                self.strategy.operation_name(),
                format!("column {:?} has no non-missing values", series.name().as_str()),
            )
        })?;

        let filled: Float64Chunked = ca
            .into_iter()
            .map(|opt| Some(opt.unwrap_or(mean)))
            .collect();

        Ok(filled.with_name(series.name().clone()).into_series())
    }

    fn fill_mode(&self, series: &Series) -> Result<Series> {
        let len = series.len();
        let mut values: Vec<AnyValue> = Vec::with_capacity(len);
        for i in 0..len {
            values.push(
                series
                    .get(i)
                    .map_err(|e| SweepError::Data(e.to_string()))?,
            );
        }

        // Count occurrences keyed by value, remembering the first index so
        // ties resolve to the earliest value in column order.
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (idx, av) in values.iter().enumerate() {
            if matches!(av, AnyValue::Null) {
                continue;
            }
            let entry = counts.entry(format!("{av:?}")).or_insert((0, idx));
            entry.0 += 1;
        }

        let mode_idx = counts
            .into_values()
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, first_idx)| first_idx)
            .ok_or_else(|| {
                SweepError::quality(
                    self.strategy.operation_name(),
                    format!("column {:?} has no non-missing values", series.name().as_str()),
                )
            })?;

        let mode = values[mode_idx].clone();
        let filled: Vec<AnyValue> = values
            .iter()
            .map(|av| {
                if matches!(av, AnyValue::Null) {
                    mode.clone()
                } else {
                    av.clone()
                }
            })
            .collect();

        Series::from_any_values_and_dtype(series.name().clone(), &filled, series.dtype(), true)
            .map_err(|e| SweepError::Data(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_fill() {
        let df = df!("x" => &[Some(1.0), None, Some(3.0)]).unwrap();

        let imputer = Imputer::new(FillStrategy::Mean);
        let out = imputer.apply(&df, &["x"]).unwrap();

        let ca = out.column("x").unwrap().f64().unwrap();
        assert_eq!(ca.get(1), Some(2.0));
        assert_eq!(ca.null_count(), 0);
    }

    #[test]
    fn test_mean_fill_per_column_independent() {
        let df = df!(
            "a" => &[Some(10.0), None],
            "b" => &[None, Some(4.0)],
        )
        .unwrap();

        let out = Imputer::new(FillStrategy::Mean).apply(&df, &["a", "b"]).unwrap();
        assert_eq!(out.column("a").unwrap().f64().unwrap().get(1), Some(10.0));
        assert_eq!(out.column("b").unwrap().f64().unwrap().get(0), Some(4.0));
    }

    #[test]
    fn test_mean_fill_all_null_column_fails() {
        let df = df!("x" => &[None::<f64>, None, None]).unwrap();

        let err = Imputer::new(FillStrategy::Mean)
            .apply(&df, &["x"])
            .unwrap_err();
        assert!(matches!(err, SweepError::Quality { .. }));
    }

    #[test]
    fn test_mode_fill_most_frequent() {
        let df = df!(
            "city" => &[Some("rome"), Some("oslo"), Some("rome"), None],
        )
        .unwrap();

        let out = Imputer::new(FillStrategy::Mode).apply(&df, &["city"]).unwrap();
        let ca = out.column("city").unwrap().str().unwrap();
        assert_eq!(ca.get(3), Some("rome"));
    }

    #[test]
    fn test_mode_tie_breaks_by_first_occurrence() {
        let df = df!(
            "c" => &[Some("b"), Some("a"), Some("a"), Some("b"), None],
        )
        .unwrap();

        let out = Imputer::new(FillStrategy::Mode).apply(&df, &["c"]).unwrap();
        let ca = out.column("c").unwrap().str().unwrap();
        // "b" and "a" both occur twice; "b" was seen first.
        assert_eq!(ca.get(4), Some("b"));
    }

    #[test]
    fn test_mode_fill_all_null_column_fails() {
        let df = df!("c" => &[None::<&str>, None]).unwrap();

        let err = Imputer::new(FillStrategy::Mode).apply(&df, &["c"]).unwrap_err();
        assert!(matches!(err, SweepError::Quality { .. }));
    }

    #[test]
    fn test_untargeted_columns_untouched() {
        let df = df!(
            "x" => &[Some(1.0), None],
            "keep" => &[Some("u"), None],
        )
        .unwrap();

        let out = Imputer::new(FillStrategy::Mean).apply(&df, &["x"]).unwrap();
        assert_eq!(out.column("keep").unwrap().null_count(), 1);
    }

    #[test]
    fn test_complete_column_is_noop() {
        let df = df!("x" => &[1.0, 2.0, 3.0]).unwrap();
        let out = Imputer::new(FillStrategy::Mean).apply(&df, &["x"]).unwrap();
        assert!(out.equals(&df));
    }
}
