//! Host options and the queries derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Options record delivered by the host on `init` / `update`.
///
/// Every field is optional; consumers fall back to their own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub groups_filter: Option<String>,
    pub institutions_filter: Option<String>,
}

impl ExportOptions {
    /// Field-wise overlay: values set in `overrides` win.
    pub fn overlay(&self, overrides: &ExportOptions) -> ExportOptions {
        ExportOptions {
            from_date: overrides.from_date.or(self.from_date),
            to_date: overrides.to_date.or(self.to_date),
            groups_filter: overrides
                .groups_filter
                .clone()
                .or_else(|| self.groups_filter.clone()),
            institutions_filter: overrides
                .institutions_filter
                .clone()
                .or_else(|| self.institutions_filter.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ExportOptions::default()
    }
}

/// Start of the default transaction window.
pub fn default_from_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl TransactionQuery {
    pub fn from_options(options: &ExportOptions, today: NaiveDate) -> Self {
        Self {
            from: options.from_date.unwrap_or_else(default_from_date),
            to: options.to_date.unwrap_or(today),
        }
    }
}

/// Group and institution filters, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institutions: Option<String>,
}

impl PositionQuery {
    pub fn from_options(options: &ExportOptions) -> Self {
        Self {
            groups: options.groups_filter.clone(),
            institutions: options.institutions_filter.clone(),
        }
    }
}

/// What a single-kind export fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Transactions,
    Positions,
}

impl ExportKind {
    /// Sheet / file label ("Transactions", "Positions")
    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Transactions => "Transactions",
            ExportKind::Positions => "Positions",
        }
    }

    /// Lowercase plural used in log lines
    pub fn noun(&self) -> &'static str {
        match self {
            ExportKind::Transactions => "transactions",
            ExportKind::Positions => "positions",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_transaction_query_defaults() {
        let today = ymd(2026, 10, 19);
        let q = TransactionQuery::from_options(&ExportOptions::default(), today);
        assert_eq!(q.from, ymd(2024, 1, 1));
        assert_eq!(q.to, today);
    }

    #[test]
    fn test_transaction_query_uses_options() {
        let opts = ExportOptions {
            from_date: Some(ymd(2023, 5, 1)),
            to_date: Some(ymd(2023, 6, 30)),
            ..Default::default()
        };
        let q = TransactionQuery::from_options(&opts, ymd(2026, 1, 1));
        assert_eq!(q.from, ymd(2023, 5, 1));
        assert_eq!(q.to, ymd(2023, 6, 30));
    }

    #[test]
    fn test_host_options_are_camel_case_and_lenient() {
        let opts: ExportOptions = serde_json::from_str(
            r#"{"fromDate":"2024-02-01","groupsFilter":"retirement","privateMode":true}"#,
        )
        .unwrap();
        assert_eq!(opts.from_date, Some(ymd(2024, 2, 1)));
        assert_eq!(opts.groups_filter.as_deref(), Some("retirement"));
        assert_eq!(opts.institutions_filter, None);

        let q = PositionQuery::from_options(&opts);
        assert_eq!(q.groups.as_deref(), Some("retirement"));
        assert_eq!(q.institutions, None);
    }

    #[test]
    fn test_overlay_prefers_overrides() {
        let base = ExportOptions {
            from_date: Some(ymd(2024, 1, 1)),
            groups_filter: Some("a".into()),
            ..Default::default()
        };
        let over = ExportOptions {
            groups_filter: Some("b".into()),
            ..Default::default()
        };
        let merged = base.overlay(&over);
        assert_eq!(merged.from_date, Some(ymd(2024, 1, 1)));
        assert_eq!(merged.groups_filter.as_deref(), Some("b"));
        assert!(ExportOptions::default().is_empty());
    }
}
