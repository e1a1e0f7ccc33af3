//! Host API over HTTP.
//!
//! `GET {base}/transactions?from=YYYY-MM-DD&to=YYYY-MM-DD`
//! `GET {base}/positions?groups=..&institutions=..` (absent filters omitted)

use async_trait::async_trait;
use folio_core::{PositionQuery, RawRecord, TransactionQuery};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::envelope::unwrap_records;
use crate::error::FetchError;
use crate::source::RecordSource;

#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, None)
    }

    /// The timeout applies per request; this layer never retries.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Value, FetchError> {
        let url = self.endpoint(path);
        debug!(%url, "GET");

        let resp = self.client.get(&url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::api(status.as_u16(), body));
        }

        Ok(resp.json::<Value>().await?)
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn get_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<RawRecord>, FetchError> {
        let records = unwrap_records(self.get_json("transactions", query).await?)?;
        debug!(count = records.len(), "fetched transactions");
        Ok(records)
    }

    async fn get_positions(&self, query: &PositionQuery) -> Result<Vec<RawRecord>, FetchError> {
        let records = unwrap_records(self.get_json("positions", query).await?)?;
        debug!(count = records.len(), "fetched positions");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let src = HttpRecordSource::new("https://host.example/api/").unwrap();
        assert_eq!(src.endpoint("positions"), "https://host.example/api/positions");
    }
}
