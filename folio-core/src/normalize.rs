//! Record normalizer: raw host records to canonical rows.
//!
//! Pure mapping. Each column of the target schema is resolved by trying its
//! accessors in order; the first present value wins, otherwise the cell is
//! [`CellValue::Empty`].

use chrono_tz::Tz;

use crate::cell::CellValue;
use crate::error::{NormalizeError, RecordError};
use crate::record::RawRecord;
use crate::row::CanonicalRow;
use crate::schema::{Accessor, ColumnRule, PositionLayout, RowSchema, TRANSACTION_ROW};
use crate::time::{calendar_date, parse_timezone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    tz: Tz,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { tz: chrono_tz::UTC }
    }
}

impl Normalizer {
    /// Derived calendar dates are taken in `tz`.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn with_timezone_name(name: &str) -> Result<Self, NormalizeError> {
        Ok(Self::new(parse_timezone(name)?))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn transaction(&self, raw: &RawRecord) -> Result<CanonicalRow, NormalizeError> {
        self.apply(&TRANSACTION_ROW, raw)
    }

    pub fn position(
        &self,
        raw: &RawRecord,
        layout: PositionLayout,
    ) -> Result<CanonicalRow, NormalizeError> {
        self.apply(layout.schema(), raw)
    }

    /// Normalize a whole sequence, keeping input order.
    pub fn transactions(&self, raws: &[RawRecord]) -> Result<Vec<CanonicalRow>, RecordError> {
        self.apply_all(&TRANSACTION_ROW, raws)
    }

    pub fn positions(
        &self,
        raws: &[RawRecord],
        layout: PositionLayout,
    ) -> Result<Vec<CanonicalRow>, RecordError> {
        self.apply_all(layout.schema(), raws)
    }

    pub fn apply(
        &self,
        schema: &'static RowSchema,
        raw: &RawRecord,
    ) -> Result<CanonicalRow, NormalizeError> {
        let cells = schema
            .columns
            .iter()
            .map(|rule| self.resolve(rule, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CanonicalRow::new(schema, cells))
    }

    pub fn apply_all(
        &self,
        schema: &'static RowSchema,
        raws: &[RawRecord],
    ) -> Result<Vec<CanonicalRow>, RecordError> {
        raws.iter()
            .enumerate()
            .map(|(index, raw)| {
                self.apply(schema, raw)
                    .map_err(|source| RecordError { index, source })
            })
            .collect()
    }

    fn resolve(&self, rule: &ColumnRule, raw: &RawRecord) -> Result<CellValue, NormalizeError> {
        for accessor in rule.candidates {
            if let Some(cell) = self.access(*accessor, raw)? {
                return Ok(cell);
            }
        }
        Ok(CellValue::Empty)
    }

    fn access(
        &self,
        accessor: Accessor,
        raw: &RawRecord,
    ) -> Result<Option<CellValue>, NormalizeError> {
        match accessor {
            Accessor::Field(name) => Ok(raw.present(name).map(CellValue::from_json)),
            Accessor::Nested(parent, name) => {
                Ok(raw.nested(parent, name).map(CellValue::from_json))
            }
            Accessor::CalendarDate(name) => {
                let Some(value) = raw.present(name) else {
                    return Ok(None);
                };
                let date = calendar_date(value, self.tz).ok_or_else(|| {
                    NormalizeError::InvalidTimestamp {
                        field: name,
                        value: value.to_string(),
                    }
                })?;
                Ok(Some(CellValue::Text(date.format("%Y-%m-%d").to_string())))
            }
        }
    }
}

/// [`Normalizer::transaction`] with dates derived in UTC.
pub fn normalize_transaction(raw: &RawRecord) -> Result<CanonicalRow, NormalizeError> {
    Normalizer::default().transaction(raw)
}

/// [`Normalizer::position`] (no time zone involved).
pub fn normalize_position(
    raw: &RawRecord,
    layout: PositionLayout,
) -> Result<CanonicalRow, NormalizeError> {
    Normalizer::default().position(raw, layout)
}
