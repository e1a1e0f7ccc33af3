use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use folio_core::ExportOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_folio_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceSection,
    pub export: ExportSection,
    pub remote: RemoteSection,
    pub filters: FiltersSection,
}

/// Where records come from. `data_dir` wins over `api_url` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    /// Request timeout for the API and the spreadsheet backend
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub out_dir: PathBuf,
    pub file_prefix: String,
    /// IANA zone used to turn `origin_date` timestamps into calendar dates
    pub timezone: String,
    pub sink: SinkKind,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            file_prefix: "Wealthica".to_string(),
            timezone: "UTC".to_string(),
            sink: SinkKind::File,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSection {
    pub backend_url: Option<String>,
    pub sheet_id: Option<String>,
}

/// Standing filters, as the host would deliver them on `init`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersSection {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub groups: Option<String>,
    pub institutions: Option<String>,
}

impl FiltersSection {
    pub fn to_options(&self) -> ExportOptions {
        ExportOptions {
            from_date: self.from_date,
            to_date: self.to_date,
            groups_filter: self.groups.clone(),
            institutions_filter: self.institutions.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Workbook file on disk
    #[default]
    File,
    /// Spreadsheet backend over HTTP
    Remote,
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_folio_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config_from(&p)?;
    if !p.exists() {
        println!("# {} not found; showing defaults", p.display());
    } else {
        println!("# {}", p.display());
    }
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
