//! Typed file-format errors. Fatal to the file they occur in; the import
//! session records them per file and keeps going.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Delimited import received spreadsheet binary. The caller should ask
    /// the user to re-label the file and retry as a spreadsheet.
    #[error("this file appears to be a spreadsheet; re-import it with the spreadsheet file kind")]
    MalformedFile,

    #[error("spreadsheet contains no sheets")]
    NoSheets,

    /// Fewer than two rows survived header discovery: nothing to import.
    #[error("spreadsheet has no data rows")]
    EmptySheet,

    #[error("could not read delimited content: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not decode spreadsheet: {0}")]
    Spreadsheet(String),
}
