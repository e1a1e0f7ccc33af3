//! Host session: lifecycle events and the current export options.

use folio_core::{ExportKind, ExportOptions};
use tracing::{debug, info};

use crate::coordinator::{ExportCoordinator, ExportOutcome};
use crate::error::ExportError;
use crate::status::{LogClass, LogEntry, StatusLevel, StatusReporter};

/// Lifecycle notification from the hosting dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Handshake done; carries the initial options.
    Init(ExportOptions),
    /// Dashboard reloaded. Options are kept.
    Reload,
    /// New filter values; replaces the current options.
    Update(ExportOptions),
}

/// Holds the options the host last delivered and gates exports on `Init`.
pub struct Session<R: StatusReporter> {
    coordinator: ExportCoordinator<R>,
    options: ExportOptions,
    ready: bool,
}

impl<R: StatusReporter> Session<R> {
    /// New session; exports stay disabled until [`HostEvent::Init`].
    pub fn new(coordinator: ExportCoordinator<R>) -> Self {
        coordinator.reporter().set_controls_enabled(false);
        Self {
            coordinator,
            options: ExportOptions::default(),
            ready: false,
        }
    }

    pub fn handle(&mut self, event: HostEvent) {
        let reporter = self.coordinator.reporter();
        match event {
            HostEvent::Init(options) => {
                info!(?options, "session initialised");
                self.options = options;
                self.ready = true;
                reporter.log(LogEntry::new("✓ Addon connected", LogClass::Success));
                reporter.set_status(StatusLevel::Success, "Ready to export");
                reporter.set_controls_enabled(true);
            }
            HostEvent::Reload => {
                debug!("dashboard reloaded");
                reporter.log(LogEntry::new("Dashboard reloaded", LogClass::Info));
            }
            HostEvent::Update(options) => {
                debug!(?options, "filters updated");
                self.options = options;
                reporter.log(LogEntry::new("Filters updated", LogClass::Info));
            }
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub async fn export_kind(&self, kind: ExportKind) -> Result<ExportOutcome, ExportError> {
        self.ensure_ready()?;
        self.coordinator.export_kind(kind, &self.options).await
    }

    pub async fn export_combined(&self) -> Result<ExportOutcome, ExportError> {
        self.ensure_ready()?;
        self.coordinator.export_combined(&self.options).await
    }

    fn ensure_ready(&self) -> Result<(), ExportError> {
        if self.ready {
            Ok(())
        } else {
            Err(ExportError::NotReady)
        }
    }
}
