//! Export coordinator: fetch → normalize → sink, with terminal-state reporting.
//!
//! One coordinator serves every export target; the sink strategy decides
//! whether rows land in a workbook file or a remote spreadsheet.
//!
//! # Example
//!
//! ```ignore
//! let coordinator = ExportCoordinator::new(
//!     Arc::new(JsonFileSource::new("dump/")),
//!     Arc::new(XlsxFileSink::new("out/")),
//!     Arc::new(TracingReporter),
//!     ArtifactNaming::default(),
//! );
//! let outcome = coordinator.export_combined(&ExportOptions::default()).await?;
//! ```

use folio_core::{
    ExportKind, ExportOptions, Normalizer, PositionQuery, RawRecord, TransactionQuery, schema_for,
    today_utc,
};
use folio_ingest::{FetchError, RecordSource};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::ExportError;
use crate::sheet::{ExportArtifact, Sheet};
use crate::sink::ExportSink;
use crate::status::{LogClass, LogEntry, StatusLevel, StatusReporter};

/// Artifact names: `<prefix>_Transactions`, `<prefix>_Positions`,
/// `<prefix>_Complete_Export`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNaming {
    pub prefix: String,
}

impl Default for ArtifactNaming {
    fn default() -> Self {
        Self {
            prefix: "Wealthica".to_string(),
        }
    }
}

impl ArtifactNaming {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn single(&self, kind: ExportKind) -> String {
        format!("{}_{}", self.prefix, kind.label())
    }

    pub fn combined(&self) -> String {
        format!("{}_Complete_Export", self.prefix)
    }
}

/// Successful terminal state of an export action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported(ExportArtifact),
    /// The fetch returned no records; nothing was written.
    Empty { kind: ExportKind },
}

/// What an operation covers, for status and log wording.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Kind(ExportKind),
    Combined,
}

impl Scope {
    fn fetching(&self) -> String {
        match self {
            Scope::Kind(kind) => format!("Fetching {kind}..."),
            Scope::Combined => "Fetching all data...".to_string(),
        }
    }

    fn starting(&self) -> &'static str {
        match self {
            Scope::Kind(ExportKind::Transactions) => "Starting transaction export...",
            Scope::Kind(ExportKind::Positions) => "Starting positions export...",
            Scope::Combined => "Starting full export (transactions + positions)...",
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            Scope::Kind(kind) => kind.noun(),
            Scope::Combined => "data",
        }
    }
}

pub struct ExportCoordinator<R: StatusReporter> {
    source: Arc<dyn RecordSource>,
    sink: Arc<dyn ExportSink>,
    reporter: Arc<R>,
    normalizer: Normalizer,
    naming: ArtifactNaming,
}

impl<R: StatusReporter> ExportCoordinator<R> {
    pub fn new(
        source: Arc<dyn RecordSource>,
        sink: Arc<dyn ExportSink>,
        reporter: Arc<R>,
        naming: ArtifactNaming,
    ) -> Self {
        Self {
            source,
            sink,
            reporter,
            normalizer: Normalizer::default(),
            naming,
        }
    }

    /// Use `normalizer` (and its time zone) for derived dates.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Export one kind of record as a single-sheet artifact.
    ///
    /// A fetch that returns no records ends in [`ExportOutcome::Empty`]
    /// without touching the sink.
    pub async fn export_kind(
        &self,
        kind: ExportKind,
        options: &ExportOptions,
    ) -> Result<ExportOutcome, ExportError> {
        let scope = Scope::Kind(kind);
        self.begin(scope);
        let result = self.export_kind_internal(kind, options).await;
        self.finish(scope, &result);
        result
    }

    /// Export transactions and positions into one two-sheet artifact.
    ///
    /// Both fetches run concurrently; the first failure aborts the whole
    /// operation. Empty sequences are still written (header row only).
    pub async fn export_combined(
        &self,
        options: &ExportOptions,
    ) -> Result<ExportOutcome, ExportError> {
        let scope = Scope::Combined;
        self.begin(scope);
        let result = self.export_combined_internal(options).await;
        self.finish(scope, &result);
        result
    }

    async fn export_kind_internal(
        &self,
        kind: ExportKind,
        options: &ExportOptions,
    ) -> Result<ExportOutcome, ExportError> {
        let records = match kind {
            ExportKind::Transactions => {
                let query = TransactionQuery::from_options(options, today_utc());
                self.source.get_transactions(&query).await?
            }
            ExportKind::Positions => {
                let query = PositionQuery::from_options(options);
                self.source.get_positions(&query).await?
            }
        };
        self.log_fetched(kind, records.len());

        if records.is_empty() {
            return Ok(ExportOutcome::Empty { kind });
        }

        let sheet = self.build_sheet(kind, self.sink.single_sheet_label(kind), &records)?;
        let artifact = self
            .sink
            .write(&self.naming.single(kind), std::slice::from_ref(&sheet))
            .await?;
        Ok(ExportOutcome::Exported(artifact))
    }

    async fn export_combined_internal(
        &self,
        options: &ExportOptions,
    ) -> Result<ExportOutcome, ExportError> {
        let tx_query = TransactionQuery::from_options(options, today_utc());
        let pos_query = PositionQuery::from_options(options);

        let (transactions, positions): (Vec<RawRecord>, Vec<RawRecord>) = tokio::try_join!(
            self.source.get_transactions(&tx_query),
            self.source.get_positions(&pos_query),
        )
        .map_err(|err: FetchError| ExportError::from(err))?;

        self.log_fetched(ExportKind::Transactions, transactions.len());
        self.log_fetched(ExportKind::Positions, positions.len());

        let sheets = [
            self.build_sheet(
                ExportKind::Transactions,
                ExportKind::Transactions.label().to_string(),
                &transactions,
            )?,
            self.build_sheet(
                ExportKind::Positions,
                ExportKind::Positions.label().to_string(),
                &positions,
            )?,
        ];
        for sheet in sheets.iter().filter(|s| s.rows.is_empty()) {
            warn!(sheet = %sheet.label, "exporting empty sheet");
        }

        let artifact = self.sink.write(&self.naming.combined(), &sheets).await?;
        Ok(ExportOutcome::Exported(artifact))
    }

    fn build_sheet(
        &self,
        kind: ExportKind,
        label: String,
        records: &[RawRecord],
    ) -> Result<Sheet, ExportError> {
        let layout = self.sink.position_layout();
        let rows = match kind {
            ExportKind::Transactions => self.normalizer.transactions(records),
            ExportKind::Positions => self.normalizer.positions(records, layout),
        }
        .map_err(|source| ExportError::MalformedRecord { kind, source })?;
        Ok(Sheet::new(label, schema_for(kind, layout), rows))
    }

    fn log(&self, message: impl Into<String>, class: LogClass) {
        self.reporter.log(LogEntry::new(message, class));
    }

    fn log_fetched(&self, kind: ExportKind, count: usize) {
        info!(%kind, count, "fetched records");
        self.log(format!("✓ Fetched {count} {kind}"), LogClass::Success);
    }

    fn begin(&self, scope: Scope) {
        self.reporter.set_controls_enabled(false);
        self.reporter.set_status(StatusLevel::Info, &scope.fetching());
        self.log(scope.starting(), LogClass::Plain);
    }

    fn finish(&self, scope: Scope, result: &Result<ExportOutcome, ExportError>) {
        match result {
            Ok(ExportOutcome::Exported(artifact)) => {
                info!(artifact = %artifact.name, "export complete");
                self.log(format!("✓ {artifact}"), LogClass::Success);
                self.reporter
                    .set_status(StatusLevel::Success, "Export complete!");
            }
            Ok(ExportOutcome::Empty { kind }) => {
                info!(%kind, "nothing to export");
                let detail = match kind {
                    ExportKind::Transactions => "⚠ No transactions found for this date range",
                    ExportKind::Positions => "⚠ No positions found",
                };
                self.log(detail, LogClass::Error);
                self.reporter
                    .set_status(StatusLevel::Error, &format!("No {kind} to export"));
            }
            Err(err) => {
                error!(error = %err, "export failed");
                self.log(
                    format!("✗ Error fetching {}: {err}", scope.subject()),
                    LogClass::Error,
                );
                self.reporter.set_status(StatusLevel::Error, "Export failed");
            }
        }
        self.reporter.set_controls_enabled(true);
    }
}
