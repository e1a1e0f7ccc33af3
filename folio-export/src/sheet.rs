use folio_core::{CanonicalRow, RowSchema};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One labelled table handed to a sink.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub label: String,
    pub schema: &'static RowSchema,
    pub rows: Vec<CanonicalRow>,
}

impl Sheet {
    pub fn new(
        label: impl Into<String>,
        schema: &'static RowSchema,
        rows: Vec<CanonicalRow>,
    ) -> Self {
        Self {
            label: label.into(),
            schema,
            rows,
        }
    }

    /// Header row followed by one row per record.
    pub fn grid_height(&self) -> usize {
        self.rows.len() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub label: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactLocation {
    File(PathBuf),
    Remote { sheet_id: String, ranges: Vec<String> },
}

/// What a sink produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub name: String,
    pub location: ArtifactLocation,
    pub sheets: Vec<SheetSummary>,
}

impl ExportArtifact {
    pub fn sheet_labels(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.label.as_str()).collect()
    }
}

impl fmt::Display for ExportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            ArtifactLocation::File(path) => {
                let file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                write!(f, "Excel file downloaded: {file}")
            }
            ArtifactLocation::Remote { sheet_id, ranges } => {
                write!(f, "Spreadsheet {sheet_id} updated: {}", ranges.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_file_uses_file_name() {
        let a = ExportArtifact {
            name: "Wealthica_Positions".into(),
            location: ArtifactLocation::File(PathBuf::from("/tmp/out/Wealthica_Positions.xlsx")),
            sheets: vec![SheetSummary {
                label: "Data".into(),
                rows: 3,
            }],
        };
        assert_eq!(a.to_string(), "Excel file downloaded: Wealthica_Positions.xlsx");
        assert_eq!(a.sheet_labels(), vec!["Data"]);
    }

    #[test]
    fn test_display_remote_lists_ranges() {
        let a = ExportArtifact {
            name: "Wealthica_Complete_Export".into(),
            location: ArtifactLocation::Remote {
                sheet_id: "abc".into(),
                ranges: vec!["Transactions!A1".into(), "Positions!A1".into()],
            },
            sheets: vec![],
        };
        assert_eq!(
            a.to_string(),
            "Spreadsheet abc updated: Transactions!A1, Positions!A1"
        );
    }
}
