//! Row-level filtering: missing-value drops and duplicate removal

use crate::error::{Result, SweepError};
use polars::prelude::*;
use std::collections::HashSet;
use std::fmt::Write as _;

/// Row filter operations. Both only ever delete rows; remaining rows keep
/// their original relative order.
pub struct RowFilter;

impl RowFilter {
    /// Remove every row containing at least one missing value, in a single
    /// pass across all columns. Returns the filtered table and the number of
    /// rows removed.
    pub fn drop_missing(df: &DataFrame) -> Result<(DataFrame, usize)> {
        let height = df.height();
        let mut keep = vec![true; height];

        for col in df.get_columns() {
            if col.null_count() == 0 {
                continue;
            }
            let is_null = col.as_materialized_series().is_null();
            for (i, null) in is_null.into_iter().enumerate() {
                if null.unwrap_or(false) {
                    keep[i] = false;
                }
            }
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let filtered = df.filter(&mask).map_err(|e| SweepError::Data(e.to_string()))?;
        let removed = height - filtered.height();
        Ok((filtered, removed))
    }

    /// Remove rows that are exact value-wise duplicates of an earlier row,
    /// keeping the first occurrence. Returns the filtered table and the
    /// count of duplicates removed.
    pub fn remove_duplicates(df: &DataFrame) -> Result<(DataFrame, usize)> {
        let height = df.height();
        let columns = df.get_columns();

        let mut seen: HashSet<String> = HashSet::with_capacity(height);
        let mut keep = Vec::with_capacity(height);

        for i in 0..height {
            let mut key = String::new();
            for col in columns {
                let av = col.get(i).map_err(|e| SweepError::Data(e.to_string()))?;
                // Unit separator keeps adjacent fields from colliding.
                let _ = write!(key, "{av:?}\x1f");
            }
            keep.push(seen.insert(key));
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let filtered = df.filter(&mask).map_err(|e| SweepError::Data(e.to_string()))?;
        let removed = height - filtered.height();
        Ok((filtered, removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_missing_removes_any_null_row() {
        let df = df!(
            "a" => &[Some(1.0), None, Some(3.0), Some(4.0)],
            "b" => &[Some("x"), Some("y"), None, Some("w")],
        )
        .unwrap();

        let (out, removed) = RowFilter::drop_missing(&df).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(out.height(), 2);
        for col in out.get_columns() {
            assert_eq!(col.null_count(), 0);
        }
    }

    #[test]
    fn test_drop_missing_preserves_order() {
        let df = df!(
            "a" => &[Some(1.0), None, Some(3.0)],
        )
        .unwrap();

        let (out, _) = RowFilter::drop_missing(&df).unwrap();
        let ca = out.column("a").unwrap().f64().unwrap();
        assert_eq!(ca.get(0), Some(1.0));
        assert_eq!(ca.get(1), Some(3.0));
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let df = df!(
            "a" => &[1i64, 2, 1],
            "b" => &["x", "y", "x"],
        )
        .unwrap();

        let (out, removed) = RowFilter::remove_duplicates(&df).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(out.height(), 2);
        assert_eq!(out.column("b").unwrap().str().unwrap().get(0), Some("x"));
        assert_eq!(out.column("b").unwrap().str().unwrap().get(1), Some("y"));
    }

    #[test]
    fn test_remove_duplicates_requires_all_columns_equal() {
        let df = df!(
            "a" => &[1i64, 1],
            "b" => &["x", "y"],
        )
        .unwrap();

        let (out, removed) = RowFilter::remove_duplicates(&df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_remove_duplicates_idempotent() {
        let df = df!(
            "a" => &[1i64, 2, 1, 2, 3],
        )
        .unwrap();

        let (once, removed_once) = RowFilter::remove_duplicates(&df).unwrap();
        let (twice, removed_twice) = RowFilter::remove_duplicates(&once).unwrap();
        assert_eq!(removed_once, 2);
        assert_eq!(removed_twice, 0);
        assert!(once.equals(&twice));
    }

    #[test]
    fn test_null_rows_compare_equal() {
        let df = df!(
            "a" => &[None::<f64>, None, Some(1.0)],
        )
        .unwrap();

        let (out, removed) = RowFilter::remove_duplicates(&df).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(out.height(), 2);
    }
}
