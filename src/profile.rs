//! Column type and missing-value profiling

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Semantic column type, decided once per profile and carried as explicit
/// metadata thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Temporal,
    Unresolved,
}

impl ColumnKind {
    /// Map a polars dtype onto its semantic kind.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            ColumnKind::Numeric
        } else {
            match dtype {
                DataType::Date
                | DataType::Datetime(_, _)
                | DataType::Time
                | DataType::Duration(_) => ColumnKind::Temporal,
                DataType::String | DataType::Boolean | DataType::Categorical(_, _) => {
                    ColumnKind::Categorical
                }
                _ => ColumnKind::Unresolved,
            }
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Temporal => "temporal",
            ColumnKind::Unresolved => "unresolved",
        };
        f.write_str(s)
    }
}

/// Per-column profile entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Count of missing entries (null, plus NaN in float columns), reported
    /// for every column.
    pub missing: usize,
}

/// Read-only snapshot of a table's types and missingness. Created fresh per
/// [`Profiler::profile`] call and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableProfile {
    pub columns: Vec<ColumnProfile>,
    pub n_rows: usize,
    pub n_cols: usize,
}

impl TableProfile {
    /// Names of columns with the given kind, in table order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Names of non-numeric columns, in table order.
    pub fn non_numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind != ColumnKind::Numeric)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Missing count for a column, if profiled.
    pub fn missing_count(&self, name: &str) -> Option<usize> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.missing)
    }

    /// Total missing entries across the table.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    /// Pretty-printed JSON rendering of the profile.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Pure, side-effect-free profiler. Run after type coercion so the reported
/// kinds reflect coerced dtypes.
pub struct Profiler;

impl Profiler {
    pub fn profile(df: &DataFrame) -> Result<TableProfile> {
        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            columns.push(ColumnProfile {
                name: col.name().to_string(),
                kind: ColumnKind::from_dtype(col.dtype()),
                missing: missing_entries(col)?,
            });
        }

        Ok(TableProfile {
            columns,
            n_rows: df.height(),
            n_cols: df.width(),
        })
    }
}

/// Nulls plus, for float columns, NaN entries. Both count as missing
/// everywhere in the pipeline, so the profile reports them the same way.
fn missing_entries(col: &Column) -> Result<usize> {
    let nulls = col.null_count();
    if !matches!(col.dtype(), DataType::Float32 | DataType::Float64) {
        return Ok(nulls);
    }
    let casted = col.as_materialized_series().cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    let nans = ca.into_iter().flatten().filter(|v| v.is_nan()).count();
    Ok(nulls + nans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_kinds_and_missing() {
        let df = df!(
            "age" => &[Some(25.0), None, Some(40.0)],
            "city" => &[Some("berlin"), Some("tokyo"), None],
            "flag" => &[true, false, true],
        )
        .unwrap();

        let profile = Profiler::profile(&df).unwrap();
        assert_eq!(profile.n_rows, 3);
        assert_eq!(profile.n_cols, 3);

        assert_eq!(profile.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(profile.columns[1].kind, ColumnKind::Categorical);
        assert_eq!(profile.columns[2].kind, ColumnKind::Categorical);

        assert_eq!(profile.missing_count("age"), Some(1));
        assert_eq!(profile.missing_count("city"), Some(1));
        // Zero-missing columns are still reported.
        assert_eq!(profile.missing_count("flag"), Some(0));
    }

    #[test]
    fn test_profile_does_not_alter_table() {
        let df = df!("x" => &[1.0, 2.0, 3.0]).unwrap();
        let before = df.clone();
        let _ = Profiler::profile(&df).unwrap();
        assert!(df.equals(&before));
    }

    #[test]
    fn test_columns_of_kind_preserves_order() {
        let df = df!(
            "b" => &[1.0, 2.0],
            "name" => &["x", "y"],
            "a" => &[3.0, 4.0],
        )
        .unwrap();

        let profile = Profiler::profile(&df).unwrap();
        assert_eq!(profile.columns_of_kind(ColumnKind::Numeric), vec!["b", "a"]);
        assert_eq!(profile.non_numeric_columns(), vec!["name"]);
    }

    #[test]
    fn test_nan_counts_as_missing_in_float_columns() {
        let df = df!(
            "x" => &[Some(1.0), Some(f64::NAN), None],
            "n" => &[1i64, 2, 3],
        )
        .unwrap();

        let profile = Profiler::profile(&df).unwrap();
        assert_eq!(profile.missing_count("x"), Some(2));
        assert_eq!(profile.missing_count("n"), Some(0));
    }

    #[test]
    fn test_profile_to_json() {
        let df = df!("x" => &[Some(1.0), None]).unwrap();
        let profile = Profiler::profile(&df).unwrap();

        let json = profile.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["n_rows"], 2);
        assert_eq!(value["columns"][0]["missing"], 1);
    }

    #[test]
    fn test_column_kind_serialize() {
        let json = serde_json::to_string(&ColumnKind::Temporal).unwrap();
        assert_eq!(json, "\"Temporal\"");
    }
}
