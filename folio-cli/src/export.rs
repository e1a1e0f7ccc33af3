//! Wiring of sources, sinks and the coordinator for `folio export`.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use folio_core::{ExportKind, ExportOptions, Normalizer};
use folio_export::{
    ArtifactNaming, ExportCoordinator, ExportOutcome, ExportSink, HostEvent, RemoteSheetSink,
    Session, XlsxFileSink,
};
use folio_ingest::{HttpRecordSource, JsonFileSource, RecordSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::{Config, SinkKind};
use crate::console::ConsoleReporter;

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Output target (default: [export] sink in config.toml)
    #[arg(long, value_enum)]
    pub sink: Option<SinkKind>,

    /// Directory for workbook files
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Read transactions.json / positions.json from this directory
    #[arg(long, conflicts_with = "api_url")]
    pub data_dir: Option<PathBuf>,

    /// Fetch records from this API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// First transaction date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last transaction date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Position group filter, passed through to the API
    #[arg(long)]
    pub groups: Option<String>,

    /// Position institution filter, passed through to the API
    #[arg(long)]
    pub institutions: Option<String>,
}

impl ExportArgs {
    /// Options as the host would send them: config filters, then flags.
    pub fn options(&self, cfg: &Config) -> ExportOptions {
        cfg.filters.to_options().overlay(&ExportOptions {
            from_date: self.from,
            to_date: self.to,
            groups_filter: self.groups.clone(),
            institutions_filter: self.institutions.clone(),
        })
    }
}

/// Which export a command asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Kind(ExportKind),
    Combined,
}

fn timeout(cfg: &Config) -> Option<Duration> {
    cfg.source.timeout_secs.map(Duration::from_secs)
}

pub fn build_source(args: &ExportArgs, cfg: &Config) -> Result<Arc<dyn RecordSource>> {
    if let Some(dir) = &args.data_dir {
        return Ok(Arc::new(JsonFileSource::new(dir)));
    }
    if let Some(url) = &args.api_url {
        let src = HttpRecordSource::with_timeout(url.as_str(), timeout(cfg))
            .context("build HTTP client")?;
        return Ok(Arc::new(src));
    }
    if let Some(dir) = &cfg.source.data_dir {
        return Ok(Arc::new(JsonFileSource::new(dir)));
    }
    if let Some(url) = &cfg.source.api_url {
        let src = HttpRecordSource::with_timeout(url.as_str(), timeout(cfg))
            .context("build HTTP client")?;
        return Ok(Arc::new(src));
    }
    bail!("no record source: pass --data-dir or --api-url, or set [source] in config.toml")
}

pub fn build_sink(args: &ExportArgs, cfg: &Config) -> Result<Arc<dyn ExportSink>> {
    match args.sink.unwrap_or(cfg.export.sink) {
        SinkKind::File => {
            let out_dir = args
                .out_dir
                .clone()
                .unwrap_or_else(|| cfg.export.out_dir.clone());
            Ok(Arc::new(XlsxFileSink::new(out_dir)))
        }
        SinkKind::Remote => {
            let url = cfg
                .remote
                .backend_url
                .as_deref()
                .context("remote sink needs [remote] backend_url in config.toml")?;
            let sheet_id = cfg
                .remote
                .sheet_id
                .as_deref()
                .context("remote sink needs [remote] sheet_id in config.toml")?;
            let sink = RemoteSheetSink::new(url, sheet_id, timeout(cfg))
                .context("build backend client")?;
            Ok(Arc::new(sink))
        }
    }
}

pub async fn run_export(target: Target, args: &ExportArgs, cfg: &Config) -> Result<()> {
    let source = build_source(args, cfg)?;
    let sink = build_sink(args, cfg)?;
    let normalizer = Normalizer::with_timezone_name(&cfg.export.timezone)
        .with_context(|| format!("[export] timezone = {:?}", cfg.export.timezone))?;
    debug!(tz = %normalizer.timezone(), "dates derived in zone");

    let coordinator = ExportCoordinator::new(
        source,
        sink,
        Arc::new(ConsoleReporter::new()),
        ArtifactNaming::new(cfg.export.file_prefix.as_str()),
    )
    .with_normalizer(normalizer);

    let mut session = Session::new(coordinator);
    session.handle(HostEvent::Init(args.options(cfg)));
    debug!(options = ?session.options(), ?target, "running export");

    let outcome = match target {
        Target::Kind(kind) => session.export_kind(kind).await?,
        Target::Combined => session.export_combined().await?,
    };
    if let ExportOutcome::Exported(artifact) = outcome {
        debug!(location = ?artifact.location, "artifact written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_filters() {
        let mut cfg = Config::default();
        cfg.filters.from_date = NaiveDate::from_ymd_opt(2023, 1, 1);
        cfg.filters.groups = Some("g1".to_string());

        let args = ExportArgs {
            from: NaiveDate::from_ymd_opt(2024, 5, 1),
            institutions: Some("inst".to_string()),
            ..Default::default()
        };
        let opts = args.options(&cfg);
        assert_eq!(opts.from_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(opts.groups_filter.as_deref(), Some("g1"));
        assert_eq!(opts.institutions_filter.as_deref(), Some("inst"));
        assert_eq!(opts.to_date, None);
    }

    #[test]
    fn test_source_required() {
        let err = build_source(&ExportArgs::default(), &Config::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("--data-dir"));
    }

    #[test]
    fn test_remote_sink_needs_backend_settings() {
        let args = ExportArgs {
            sink: Some(SinkKind::Remote),
            ..Default::default()
        };
        let err = build_sink(&args, &Config::default()).err().unwrap();
        assert!(err.to_string().contains("backend_url"));

        let mut cfg = Config::default();
        cfg.remote.backend_url = Some("http://localhost:9/sheets".to_string());
        cfg.remote.sheet_id = Some("s1".to_string());
        assert!(build_sink(&args, &cfg).is_ok());
    }

    #[tokio::test]
    async fn test_run_export_writes_workbook_from_data_dir() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(
            input.path().join("positions.json"),
            r#"{"data": [{"security": {"symbol": "XYZ"}, "quantity": 3}]}"#,
        )
        .unwrap();

        let args = ExportArgs {
            data_dir: Some(input.path().to_path_buf()),
            out_dir: Some(output.path().to_path_buf()),
            ..Default::default()
        };
        run_export(Target::Kind(ExportKind::Positions), &args, &Config::default())
            .await
            .unwrap();

        assert!(output.path().join("Wealthica_Positions.xlsx").is_file());
    }

    #[tokio::test]
    async fn test_bad_timezone_is_reported() {
        let input = tempfile::tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.export.timezone = "Mars/Olympus".to_string();
        let args = ExportArgs {
            data_dir: Some(input.path().to_path_buf()),
            ..Default::default()
        };
        let err = run_export(Target::Combined, &args, &cfg).await.unwrap_err();
        assert!(format!("{err:#}").contains("Mars/Olympus"));
    }
}
