//! Fixed column schemas for exported rows.
//!
//! Each column carries an ordered list of accessors. The normalizer tries them
//! in order and keeps the first present value.

use serde::{Deserialize, Serialize};

use crate::options::ExportKind;

/// How one candidate value is pulled out of a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// Top-level field
    Field(&'static str),
    /// `parent.field`, only when `parent` is an object
    Nested(&'static str, &'static str),
    /// Timestamp field reduced to a `YYYY-MM-DD` calendar date
    CalendarDate(&'static str),
}

/// Column label plus its field resolution rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRule {
    pub label: &'static str,
    pub candidates: &'static [Accessor],
}

#[derive(Debug, PartialEq, Eq)]
pub struct RowSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnRule],
}

impl RowSchema {
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.label)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }
}

use Accessor::{CalendarDate, Field, Nested};

pub static TRANSACTION_ROW: RowSchema = RowSchema {
    name: "transaction",
    columns: &[
        ColumnRule {
            label: "Date",
            candidates: &[Field("date"), CalendarDate("origin_date")],
        },
        ColumnRule {
            label: "Type",
            candidates: &[Field("type")],
        },
        ColumnRule {
            label: "Description",
            candidates: &[Field("description")],
        },
        ColumnRule {
            label: "Symbol",
            candidates: &[Field("symbol"), Field("ticker")],
        },
        ColumnRule {
            label: "Quantity",
            candidates: &[Field("quantity")],
        },
        ColumnRule {
            label: "Price",
            candidates: &[Field("price")],
        },
        ColumnRule {
            label: "Amount",
            candidates: &[Field("currency_amount"), Field("amount")],
        },
        ColumnRule {
            label: "Currency",
            candidates: &[Field("currency")],
        },
        ColumnRule {
            label: "Account",
            candidates: &[Field("account_id")],
        },
        ColumnRule {
            label: "Institution",
            candidates: &[Field("institution")],
        },
    ],
};

/// Position row for workbook files, including gain columns.
pub static POSITION_ROW: RowSchema = RowSchema {
    name: "position",
    columns: &[
        ColumnRule {
            label: "Symbol",
            candidates: &[Nested("security", "symbol"), Field("symbol")],
        },
        ColumnRule {
            label: "Name",
            candidates: &[Nested("security", "name"), Field("name")],
        },
        ColumnRule {
            label: "Type",
            candidates: &[Nested("security", "type"), Field("type")],
        },
        ColumnRule {
            label: "Quantity",
            candidates: &[Field("quantity")],
        },
        ColumnRule {
            label: "Book Value",
            candidates: &[Field("book_value")],
        },
        ColumnRule {
            label: "Market Value",
            candidates: &[Field("market_value"), Field("value")],
        },
        ColumnRule {
            label: "Gain/Loss",
            candidates: &[Field("gain_amount")],
        },
        ColumnRule {
            label: "Gain/Loss %",
            candidates: &[Field("gain_percent")],
        },
        ColumnRule {
            label: "Currency",
            candidates: &[Nested("security", "currency"), Field("currency")],
        },
        ColumnRule {
            label: "Institution",
            candidates: &[Field("institution")],
        },
    ],
};

/// Position row for the spreadsheet backend. No gain columns.
pub static POSITION_ROW_COMPACT: RowSchema = RowSchema {
    name: "position-compact",
    columns: &[
        ColumnRule {
            label: "Symbol",
            candidates: &[Nested("security", "symbol"), Field("symbol")],
        },
        ColumnRule {
            label: "Name",
            candidates: &[Nested("security", "name"), Field("name")],
        },
        ColumnRule {
            label: "Type",
            candidates: &[Nested("security", "type"), Field("type")],
        },
        ColumnRule {
            label: "Quantity",
            candidates: &[Field("quantity")],
        },
        ColumnRule {
            label: "Book Value",
            candidates: &[Field("book_value")],
        },
        ColumnRule {
            label: "Market Value",
            candidates: &[Field("market_value"), Field("value")],
        },
        ColumnRule {
            label: "Currency",
            candidates: &[Nested("security", "currency"), Field("currency")],
        },
        ColumnRule {
            label: "Institution",
            candidates: &[Field("institution")],
        },
    ],
};

/// Which position row shape an export target expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionLayout {
    #[default]
    WithGain,
    Compact,
}

impl PositionLayout {
    pub fn schema(self) -> &'static RowSchema {
        match self {
            PositionLayout::WithGain => &POSITION_ROW,
            PositionLayout::Compact => &POSITION_ROW_COMPACT,
        }
    }
}

/// Schema used for `kind` under the given position layout.
pub fn schema_for(kind: ExportKind, layout: PositionLayout) -> &'static RowSchema {
    match kind {
        ExportKind::Transactions => &TRANSACTION_ROW,
        ExportKind::Positions => layout.schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_labels_in_order() {
        let labels: Vec<_> = TRANSACTION_ROW.labels().collect();
        assert_eq!(
            labels,
            vec![
                "Date", "Type", "Description", "Symbol", "Quantity", "Price", "Amount",
                "Currency", "Account", "Institution"
            ]
        );
    }

    #[test]
    fn test_position_layouts_differ_only_by_gain_columns() {
        assert_eq!(POSITION_ROW.len(), 10);
        assert_eq!(POSITION_ROW_COMPACT.len(), 8);

        let compact: Vec<_> = POSITION_ROW_COMPACT.labels().collect();
        let full: Vec<_> = POSITION_ROW
            .labels()
            .filter(|l| !l.starts_with("Gain/Loss"))
            .collect();
        assert_eq!(compact, full);
    }

    #[test]
    fn test_schema_for_kind() {
        assert_eq!(
            schema_for(ExportKind::Positions, PositionLayout::Compact).name,
            "position-compact"
        );
        assert_eq!(
            schema_for(ExportKind::Transactions, PositionLayout::Compact).name,
            "transaction"
        );
        assert_eq!(POSITION_ROW.position_of("Market Value"), Some(5));
    }
}
