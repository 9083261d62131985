//! kis-ingest: turns raw bank-export bytes (CSV or spreadsheet, mixed
//! English/Hebrew schemas) into normalized transactions, and orchestrates
//! the multi-file import session up to the user review steps.

pub mod error;
pub mod locale;
pub mod mapper;
pub mod normalizer;
pub mod reader;
pub mod session;

pub use error::IngestError;
pub use locale::{parse_amount, parse_date};
pub use mapper::{auto_detect_mapping, ColumnMapping, MappingOutcome};
pub use normalizer::normalize_rows;
pub use reader::{read_table, FileKind, ParsedTable};
pub use session::{FileStatus, ImportAnalysis, ImportFailure, ImportSession, MerchantGroup};
