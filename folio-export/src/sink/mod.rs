//! Export sinks: where canonical rows end up.

mod remote;
mod xlsx;

pub use remote::{RemoteSheetSink, SheetPayload, sheet_payload};
pub use xlsx::{MAX_SHEET_NAME_LEN, MAX_WORKSHEET_ROWS, XlsxFileSink, sanitize_sheet_name};

use async_trait::async_trait;
use folio_core::{ExportKind, PositionLayout};

use crate::error::SinkError;
use crate::sheet::{ExportArtifact, Sheet};

/// Sheet label for single-kind workbook exports.
pub const SINGLE_SHEET_LABEL: &str = "Data";

/// Turns labelled sheets into a tabular artifact.
///
/// The sink also decides the position row shape, since file and backend
/// targets carry different position columns.
#[async_trait]
pub trait ExportSink: Send + Sync {
    fn position_layout(&self) -> PositionLayout;

    /// Label of the only sheet in a single-kind export.
    fn single_sheet_label(&self, _kind: ExportKind) -> String {
        SINGLE_SHEET_LABEL.to_string()
    }

    /// Write `sheets` in order as one artifact named `name`.
    async fn write(&self, name: &str, sheets: &[Sheet]) -> Result<ExportArtifact, SinkError>;
}
