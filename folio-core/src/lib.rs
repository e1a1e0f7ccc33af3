//! folio-core: raw host records, canonical export rows, and the normalizer between them

pub mod cell;
pub mod error;
pub mod normalize;
pub mod options;
pub mod record;
pub mod row;
pub mod schema;
pub mod time;

pub use cell::CellValue;
pub use error::{NormalizeError, RecordError};
pub use normalize::{Normalizer, normalize_position, normalize_transaction};
pub use options::{ExportKind, ExportOptions, PositionQuery, TransactionQuery, default_from_date};
pub use record::{RawPosition, RawRecord, RawTransaction, is_present};
pub use row::CanonicalRow;
pub use schema::{
    Accessor, ColumnRule, POSITION_ROW, POSITION_ROW_COMPACT, PositionLayout, RowSchema,
    TRANSACTION_ROW, schema_for,
};
pub use time::{calendar_date, parse_timezone, today_utc};
