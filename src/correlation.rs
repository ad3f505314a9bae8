//! Pearson correlation over numeric columns

use crate::error::{Result, SweepError};
use ndarray::ArrayView1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Pearson correlation matrix over numeric columns, with rows and columns
/// labeled by column name. Serializable so it can ride along in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major values; `values[i][j]` is the correlation between
    /// `columns[i]` and `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Render as a labeled table: a leading "column" name column followed by
    /// one column per numeric input column.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let n = self.columns.len();
        let mut out: Vec<Column> = Vec::with_capacity(n + 1);
        let labels: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        out.push(Column::new("column".into(), &labels));
        for (j, name) in self.columns.iter().enumerate() {
            let col: Vec<f64> = (0..n).map(|i| self.values[i][j]).collect();
            out.push(Column::new(name.as_str().into(), &col));
        }
        DataFrame::new(out).map_err(|e| SweepError::Data(e.to_string()))
    }
}

/// Compute the Pearson correlation matrix over the numeric columns of `df`,
/// using pairwise-complete observations. Diagonal entries are 1.0; pairs
/// with fewer than two complete observations or zero variance yield NaN.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let numeric: Vec<(String, Vec<Option<f64>>)> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .map(|c| {
            let casted = c
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| SweepError::Data(e.to_string()))?;
            let ca = casted.f64().map_err(|e| SweepError::Data(e.to_string()))?;
            Ok((c.name().to_string(), ca.into_iter().collect()))
        })
        .collect::<Result<_>>()?;

    if numeric.is_empty() {
        return Err(SweepError::quality(
            "correlation",
            "table has no numeric columns",
        ));
    }

    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pairwise_pearson(&numeric[i].1, &numeric[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: numeric.into_iter().map(|(name, _)| name).collect(),
        values,
    })
}

/// Pearson correlation over rows where both values are present.
fn pairwise_pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();

    if xs.len() < 2 {
        return f64::NAN;
    }

    pearson(ArrayView1::from(&xs[..]), ArrayView1::from(&ys[..]))
}

fn pearson(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let x_mean = x.mean().unwrap_or(0.0);
    let y_mean = y.mean().unwrap_or(0.0);

    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sum_xy += dx * dy;
        sum_x2 += dx * dx;
        sum_y2 += dy * dy;
    }

    let denom = (sum_x2 * sum_y2).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        (sum_xy / denom).clamp(-1.0, 1.0)
    }
}
