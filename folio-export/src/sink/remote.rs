//! Spreadsheet backend sink.
//!
//! Each sheet becomes one `POST` of `{"sheetId", "range", "values"}` to the
//! backend, where `values` is the header row followed by the data rows.

use async_trait::async_trait;
use folio_core::{ExportKind, PositionLayout};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::ExportSink;
use crate::error::SinkError;
use crate::sheet::{ArtifactLocation, ExportArtifact, Sheet, SheetSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPayload {
    pub sheet_id: String,
    pub range: String,
    pub values: Vec<Vec<Value>>,
}

/// Build the backend request body for one sheet.
pub fn sheet_payload(sheet_id: &str, sheet: &Sheet) -> SheetPayload {
    let mut values = Vec::with_capacity(sheet.grid_height());
    values.push(
        sheet
            .schema
            .labels()
            .map(|l| Value::String(l.to_string()))
            .collect(),
    );
    for row in &sheet.rows {
        values.push(row.cells().iter().map(|c| c.to_json()).collect());
    }

    SheetPayload {
        sheet_id: sheet_id.to_string(),
        range: format!("{}!A1", sheet.label),
        values,
    }
}

#[derive(Debug, Clone)]
pub struct RemoteSheetSink {
    client: reqwest::Client,
    backend_url: String,
    sheet_id: String,
}

impl RemoteSheetSink {
    pub fn new(
        backend_url: impl Into<String>,
        sheet_id: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, SinkError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            backend_url: backend_url.into(),
            sheet_id: sheet_id.into(),
        })
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    async fn post(&self, payload: &SheetPayload) -> Result<(), SinkError> {
        debug!(url = %self.backend_url, range = %payload.range, rows = payload.values.len(), "POST");
        let resp = self
            .client
            .post(&self.backend_url)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SinkError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ExportSink for RemoteSheetSink {
    fn position_layout(&self) -> PositionLayout {
        PositionLayout::Compact
    }

    fn single_sheet_label(&self, kind: ExportKind) -> String {
        kind.label().to_string()
    }

    async fn write(&self, name: &str, sheets: &[Sheet]) -> Result<ExportArtifact, SinkError> {
        let mut ranges = Vec::with_capacity(sheets.len());
        for sheet in sheets {
            let payload = sheet_payload(&self.sheet_id, sheet);
            self.post(&payload).await?;
            ranges.push(payload.range);
        }
        info!(sheet_id = %self.sheet_id, sheets = sheets.len(), "spreadsheet updated");

        Ok(ExportArtifact {
            name: name.to_string(),
            location: ArtifactLocation::Remote {
                sheet_id: self.sheet_id.clone(),
                ranges,
            },
            sheets: sheets
                .iter()
                .map(|s| SheetSummary {
                    label: s.label.clone(),
                    rows: s.rows.len(),
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Normalizer, RawRecord};
    use serde_json::json;

    #[test]
    fn test_payload_header_first_and_empty_cells_as_blank_strings() {
        let rows = Normalizer::default()
            .positions(
                &[RawRecord::new(json!({
                    "security": {"symbol": "XYZ"},
                    "quantity": 10,
                    "gain_amount": 99
                }))],
                PositionLayout::Compact,
            )
            .unwrap();
        let sheet = Sheet::new("Positions", PositionLayout::Compact.schema(), rows);

        let payload = sheet_payload("sheet-1", &sheet);
        assert_eq!(payload.range, "Positions!A1");
        assert_eq!(payload.values.len(), 2);
        assert_eq!(
            payload.values[0],
            vec![
                json!("Symbol"),
                json!("Name"),
                json!("Type"),
                json!("Quantity"),
                json!("Book Value"),
                json!("Market Value"),
                json!("Currency"),
                json!("Institution")
            ]
        );
        assert_eq!(
            payload.values[1],
            vec![
                json!("XYZ"),
                json!(""),
                json!(""),
                json!(10.0),
                json!(""),
                json!(""),
                json!(""),
                json!("")
            ]
        );

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["sheetId"], json!("sheet-1"));
        assert!(body.get("sheet_id").is_none());
    }

    #[test]
    fn test_single_sheet_label_is_kind_label() {
        let sink = RemoteSheetSink::new("http://localhost:1/sheets", "s", None).unwrap();
        assert_eq!(sink.single_sheet_label(ExportKind::Positions), "Positions");
        assert_eq!(sink.position_layout(), PositionLayout::Compact);
    }
}
