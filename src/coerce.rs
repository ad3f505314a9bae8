//! Best-effort temporal type coercion
//!
//! Attempts to reinterpret string columns as dates or datetimes. A column is
//! retyped only when every non-missing value parses with one consistent
//! format; otherwise it is left completely unchanged.

use crate::error::Result;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
];

/// Whole-column string-to-temporal coercion.
///
/// Idempotent: non-string columns (including already-coerced temporal ones)
/// are skipped, and a failed column is identical to its input.
pub struct TypeCoercer;

impl TypeCoercer {
    /// Coerce every eligible column of `df`, returning the (possibly)
    /// retyped table. Per-column failure is silent and never aborts the run.
    pub fn coerce(df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        for name in &names {
            let col = result.column(name.as_str())?;
            if col.dtype() != &DataType::String {
                continue;
            }

            let series = col.as_materialized_series().clone();
            match Self::coerce_column(&series) {
                Some(temporal) => {
                    debug!(column = %name, dtype = %temporal.dtype(), "coerced to temporal");
                    result.replace(name.as_str(), temporal)?;
                }
                None => {
                    debug!(column = %name, "temporal coercion skipped");
                }
            }
        }

        Ok(result)
    }

    /// Try to parse an entire string column as datetime, then as date.
    /// Returns `None` when no single format covers every non-missing value
    /// or the column has no values to judge by.
    fn coerce_column(series: &Series) -> Option<Series> {
        let ca = series.str().ok()?;
        let values: Vec<Option<&str>> = ca.into_iter().collect();

        if values.iter().all(|v| v.is_none()) {
            return None;
        }

        for fmt in DATETIME_FORMATS {
            if let Some(parsed) = Self::parse_all_datetimes(&values, fmt) {
                let ms: Int64Chunked = parsed
                    .into_iter()
                    .map(|opt| opt.map(|dt| dt.and_utc().timestamp_millis()))
                    .collect();
                return Some(
                    ms.with_name(series.name().clone())
                        .into_datetime(TimeUnit::Milliseconds, None)
                        .into_series(),
                );
            }
        }

        for fmt in DATE_FORMATS {
            if let Some(parsed) = Self::parse_all_dates(&values, fmt) {
                let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
                let days: Int32Chunked = parsed
                    .into_iter()
                    .map(|opt| opt.map(|d| (d - epoch).num_days() as i32))
                    .collect();
                return Some(
                    days.with_name(series.name().clone())
                        .into_date()
                        .into_series(),
                );
            }
        }

        None
    }

    fn parse_all_datetimes(
        values: &[Option<&str>],
        fmt: &str,
    ) -> Option<Vec<Option<NaiveDateTime>>> {
        let mut out = Vec::with_capacity(values.len());
        for v in values {
            match v {
                None => out.push(None),
                Some(s) => match NaiveDateTime::parse_from_str(s.trim(), fmt) {
                    Ok(dt) => out.push(Some(dt)),
                    Err(_) => return None,
                },
            }
        }
        Some(out)
    }

    fn parse_all_dates(values: &[Option<&str>], fmt: &str) -> Option<Vec<Option<NaiveDate>>> {
        let mut out = Vec::with_capacity(values.len());
        for v in values {
            match v {
                None => out.push(None),
                Some(s) => match NaiveDate::parse_from_str(s.trim(), fmt) {
                    Ok(d) => out.push(Some(d)),
                    Err(_) => return None,
                },
            }
        }
        Some(out)
    }
}
