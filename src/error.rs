use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("invalid risk level: {0:?} (expected low, medium or high)")]
    InvalidRiskLevel(String),

    #[error("invalid fees status: {0:?} (expected paid, overdue or partial)")]
    InvalidFeesStatus(String),

    #[error("duplicate student id: {0:?}")]
    DuplicateId(String),
}

/// Typed failure reasons for an upload task.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("unsupported file format {extension:?} (accepted: {accepted})")]
    UnsupportedFormat { extension: String, accepted: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV at record {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record {row}: {source}")]
    Record {
        row: usize,
        #[source]
        source: DashboardError,
    },

    #[error("upload task did not complete: {0}")]
    Aborted(String),
}
