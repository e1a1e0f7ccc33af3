//! Workbook file sink backed by `rust_xlsxwriter`.

use async_trait::async_trait;
use folio_core::{CellValue, PositionLayout};
use rust_xlsxwriter::{ColNum, Format, FormatBorder, RowNum, Workbook, Worksheet};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ExportSink;
use crate::error::SinkError;
use crate::sheet::{ArtifactLocation, ExportArtifact, Sheet, SheetSummary};

/// Excel worksheet maximum row count.
pub const MAX_WORKSHEET_ROWS: usize = 1_048_576;
/// Excel sheet name maximum length.
pub const MAX_SHEET_NAME_LEN: usize = 31;
const ILLEGAL_SHEET_CHARS: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];

/// Writes `<out_dir>/<name>.xlsx`, one worksheet per sheet.
#[derive(Debug, Clone)]
pub struct XlsxFileSink {
    out_dir: PathBuf,
}

impl XlsxFileSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{name}.xlsx"))
    }

    /// Blocking: creates the output directory and writes the whole file.
    fn save_workbook(&self, path: &Path, sheets: &[Sheet]) -> Result<(), SinkError> {
        std::fs::create_dir_all(&self.out_dir).map_err(|source| SinkError::Io {
            path: self.out_dir.clone(),
            source,
        })?;
        let mut workbook = self.build_workbook(sheets)?;
        workbook.save(path)?;
        Ok(())
    }

    fn build_workbook(&self, sheets: &[Sheet]) -> Result<Workbook, SinkError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold().set_border_bottom(FormatBorder::Thin);
        let mut names_taken = BTreeSet::new();

        for sheet in sheets {
            if sheet.grid_height() > MAX_WORKSHEET_ROWS {
                return Err(SinkError::TooManyRows {
                    sheet: sheet.label.clone(),
                    rows: sheet.rows.len(),
                    limit: MAX_WORKSHEET_ROWS - 1,
                });
            }

            let name = unique_sheet_name(&sanitize_sheet_name(&sheet.label), &mut names_taken);
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&name)?;
            write_sheet(worksheet, sheet, &header)?;
            debug!(sheet = %name, rows = sheet.rows.len(), "worksheet written");
        }

        Ok(workbook)
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, header: &Format) -> Result<(), SinkError> {
    for (col, label) in sheet.schema.labels().enumerate() {
        worksheet.write_string_with_format(0, col as ColNum, label, header)?;
    }

    for (idx, row) in sheet.rows.iter().enumerate() {
        let row_num = (idx + 1) as RowNum;
        for (col, cell) in row.cells().iter().enumerate() {
            let col = col as ColNum;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();
    Ok(())
}

/// Replace characters Excel rejects in sheet names and clamp the length.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if ILLEGAL_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return "Sheet".to_string();
    }
    cleaned.chars().take(MAX_SHEET_NAME_LEN).collect()
}

fn unique_sheet_name(name: &str, taken: &mut BTreeSet<String>) -> String {
    // Excel compares sheet names case-insensitively
    if taken.insert(name.to_lowercase()) {
        return name.to_string();
    }

    let mut n = 2usize;
    loop {
        let suffix = format!("_{n}");
        let base: String = name
            .chars()
            .take(MAX_SHEET_NAME_LEN - suffix.len())
            .collect();
        let candidate = format!("{base}{suffix}");
        if taken.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

#[async_trait]
impl ExportSink for XlsxFileSink {
    fn position_layout(&self) -> PositionLayout {
        PositionLayout::WithGain
    }

    async fn write(&self, name: &str, sheets: &[Sheet]) -> Result<ExportArtifact, SinkError> {
        let path = self.path_for(name);
        let sink = self.clone();
        let target = path.clone();
        let owned = sheets.to_vec();
        tokio::task::spawn_blocking(move || sink.save_workbook(&target, &owned)).await??;
        info!(path = %path.display(), sheets = sheets.len(), "workbook saved");

        Ok(ExportArtifact {
            name: name.to_string(),
            location: ArtifactLocation::File(path),
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
