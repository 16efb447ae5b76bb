//! Error types for dataset ingestion.
//!
//! Malformed *fields* inside a row are not errors (they deserialize to
//! `None` and are excluded from hierarchy counts); these variants cover
//! the cases where the dataset as a whole cannot be used.

use thiserror::Error;

/// Dataset-level load failure.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Dataset {path} is missing required column '{column}'")]
    MissingColumn { path: String, column: String },

    #[error("Failed to read headers from {path}: {source}")]
    Headers {
        path: String,
        #[source]
        source: csv::Error,
    },
}
