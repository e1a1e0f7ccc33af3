//! Error types for sinks and export operations.

use folio_core::{ExportKind, RecordError};
use folio_ingest::FetchError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while producing the output artifact.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sheet `{sheet}` has {rows} rows; a worksheet holds at most {limit}")]
    TooManyRows {
        sheet: String,
        rows: usize,
        limit: usize,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("workbook writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Non-OK answer from the spreadsheet backend
    #[error("backend error ({status}): {body}")]
    Backend { status: u16, body: String },
}

/// Terminal failure of an export action.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("malformed {kind} {source}")]
    MalformedRecord {
        kind: ExportKind,
        #[source]
        source: RecordError,
    },

    #[error("export requested before the host session was initialised")]
    NotReady,
}

/// Cause of an [`ExportError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Sink,
    MalformedInput,
    NotReady,
}

impl ExportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::Fetch(_) => ErrorKind::Fetch,
            ExportError::Sink(_) => ErrorKind::Sink,
            ExportError::MalformedRecord { .. } => ErrorKind::MalformedInput,
            ExportError::NotReady => ErrorKind::NotReady,
        }
    }
}
