//! folio-ingest: record sources for host transactions and positions.

pub mod envelope;
pub mod error;
pub mod file;
pub mod http;
pub mod source;

pub use envelope::unwrap_records;
pub use error::FetchError;
pub use file::JsonFileSource;
pub use http::HttpRecordSource;
pub use source::RecordSource;
