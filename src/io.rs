//! Loading and saving tabular datasets

use crate::error::{Result, SweepError};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Number of leading rows used for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Data loader for column-oriented file formats
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row.
    pub fn load_csv(path: &Path) -> Result<DataFrame> {
        Self::load_delimited(path, b',')
    }

    /// Load a delimiter-separated file with a header row.
    pub fn load_delimited(path: &Path, delimiter: u8) -> Result<DataFrame> {
        let file = File::open(path)
            .map_err(|e| SweepError::Input(format!("cannot open {}: {e}", path.display())))?;

        let parse_opts = CsvParseOptions::default().with_separator(delimiter);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| SweepError::Input(format!("cannot parse {}: {e}", path.display())))?;

        Self::reject_empty(df, path)
    }

    /// Load a line-delimited JSON file.
    pub fn load_json(path: &Path) -> Result<DataFrame> {
        let file = File::open(path)
            .map_err(|e| SweepError::Input(format!("cannot open {}: {e}", path.display())))?;

        let df = JsonReader::new(file)
            .finish()
            .map_err(|e| SweepError::Input(format!("cannot parse {}: {e}", path.display())))?;

        Self::reject_empty(df, path)
    }

    /// Load a Parquet file.
    pub fn load_parquet(path: &Path) -> Result<DataFrame> {
        let file = File::open(path)
            .map_err(|e| SweepError::Input(format!("cannot open {}: {e}", path.display())))?;

        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| SweepError::Input(format!("cannot parse {}: {e}", path.display())))?;

        Self::reject_empty(df, path)
    }

    /// Detect the file format from the extension and load.
    pub fn load_auto(path: &Path) -> Result<DataFrame> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Self::load_csv(path),
            "tsv" => Self::load_delimited(path, b'\t'),
            "json" | "jsonl" => Self::load_json(path),
            "parquet" | "pq" => Self::load_parquet(path),
            other => Err(SweepError::Input(format!(
                "unsupported file format: {other:?} ({})",
                path.display()
            ))),
        }
    }

    fn reject_empty(df: DataFrame, path: &Path) -> Result<DataFrame> {
        if df.width() == 0 {
            return Err(SweepError::Input(format!(
                "{} has no columns (missing header row?)",
                path.display()
            )));
        }
        if df.height() == 0 {
            return Err(SweepError::Input(format!(
                "{} contains no data rows",
                path.display()
            )));
        }
        Ok(df)
    }
}

/// Save a DataFrame to disk
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV, UTF-8 with a header row and no index column.
    pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .map_err(|e| SweepError::Data(format!("cannot create {}: {e}", path.display())))?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| SweepError::Data(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "a,b,c").unwrap();
        writeln!(file, "1,2,x").unwrap();
        writeln!(file, "4,5,y").unwrap();
        writeln!(file, "7,8,z").unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv();
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_load_auto_by_extension() {
        let file = create_test_csv();
        let df = DataLoader::load_auto(file.path()).unwrap();
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_unsupported_format() {
        let file = tempfile::Builder::new().suffix(".xyz").tempfile().unwrap();
        let err = DataLoader::load_auto(file.path()).unwrap_err();
        assert!(matches!(err, SweepError::Input(_)));
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "a,b").unwrap();
        let err = DataLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, SweepError::Input(_)));
    }

    #[test]
    fn test_save_csv_round_trip() {
        let mut df = DataFrame::new(vec![
            Column::new("a".into(), &[1i64, 2, 3]),
            Column::new("b".into(), &["x", "y", "z"]),
        ])
        .unwrap();

        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        DataSaver::save_csv(&mut df, file.path()).unwrap();

        let loaded = DataLoader::load_csv(file.path()).unwrap();
        // Int64 and String columns reload with the same dtypes, so the
        // frames compare equal value for value.
        assert!(loaded.equals(&df));
    }
}
