use async_trait::async_trait;
use folio_core::{PositionQuery, RawRecord, TransactionQuery};

use crate::error::FetchError;

/// Fetch side of an export: where raw host records come from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn get_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<RawRecord>, FetchError>;

    async fn get_positions(&self, query: &PositionQuery) -> Result<Vec<RawRecord>, FetchError>;
}
