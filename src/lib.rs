//! datasweep - Data-cleaning pipeline for tabular datasets
//!
//! Profiles a table (types, missing values, duplicates, outliers), applies a
//! user-selected set of deterministic cleaning operations in a fixed
//! precedence order, and returns the cleaned table plus a report and an
//! optional correlation view.
//!
//! # Modules
//!
//! - [`coerce`] - Best-effort string-to-temporal column coercion
//! - [`profile`] - Column type and missing-value profiling
//! - [`impute`] - Mean/mode missing-value imputation
//! - [`filter`] - Missing-row drops and duplicate removal
//! - [`outlier`] - Sequential IQR outlier row removal
//! - [`pipeline`] - Orchestration and reporting
//! - [`correlation`] - Pearson correlation over numeric columns
//! - [`io`] - Dataset loading and CSV export
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Cleaning operations
pub mod coerce;
pub mod filter;
pub mod impute;
pub mod outlier;
pub mod profile;

// Orchestration
pub mod pipeline;

// Analysis
pub mod correlation;

// Utilities
pub mod io;

// Services
pub mod cli;

pub use error::{Result, SweepError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, SweepError};

    // Coercion and profiling
    pub use crate::coerce::TypeCoercer;
    pub use crate::profile::{ColumnKind, ColumnProfile, Profiler, TableProfile};

    // Cleaning operations
    pub use crate::filter::RowFilter;
    pub use crate::impute::{FillStrategy, Imputer};
    pub use crate::outlier::{ColumnRemoval, OutlierRemover};

    // Orchestration
    pub use crate::pipeline::{
        CleanOp, CleaningPipeline, CleaningReport, CleaningResult, OperationSet,
    };

    // Analysis
    pub use crate::correlation::{correlation_matrix, CorrelationMatrix};

    // IO
    pub use crate::io::{DataLoader, DataSaver};
}
