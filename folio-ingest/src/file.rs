//! Records saved from the host API as JSON files.
//!
//! Layout: `<dir>/transactions.json` and `<dir>/positions.json`, each holding
//! either a bare array or a `{"data": [...]}` envelope. Query filters are not
//! applied; the files are exported as-is.

use async_trait::async_trait;
use folio_core::{PositionQuery, RawRecord, TransactionQuery};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::envelope::unwrap_records;
use crate::error::FetchError;
use crate::source::RecordSource;

pub const TRANSACTIONS_FILE: &str = "transactions.json";
pub const POSITIONS_FILE: &str = "positions.json";

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read(&self, file: &str) -> Result<Vec<RawRecord>, FetchError> {
        let path = self.dir.join(file);
        debug!(path = %path.display(), "reading records");
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
        let value: Value = serde_json::from_slice(&bytes)?;
        unwrap_records(value)
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn get_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<RawRecord>, FetchError> {
        debug!(from = %query.from, to = %query.to, "file source ignores date range");
        self.read(TRANSACTIONS_FILE).await
    }

    async fn get_positions(&self, _query: &PositionQuery) -> Result<Vec<RawRecord>, FetchError> {
        self.read(POSITIONS_FILE).await
    }
}
