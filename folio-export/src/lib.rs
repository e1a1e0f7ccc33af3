//! folio-export: export sinks, the export coordinator, and host session state.

pub mod coordinator;
pub mod error;
pub mod session;
pub mod sheet;
pub mod sink;
pub mod status;

pub use coordinator::{ArtifactNaming, ExportCoordinator, ExportOutcome};
pub use error::{ErrorKind, ExportError, SinkError};
pub use session::{HostEvent, Session};
pub use sheet::{ArtifactLocation, ExportArtifact, Sheet, SheetSummary};
pub use sink::{ExportSink, RemoteSheetSink, SINGLE_SHEET_LABEL, XlsxFileSink};
pub use status::{LogClass, LogEntry, MemoryReporter, StatusLevel, StatusReporter, TracingReporter};
