// Spreadsheet ingestion: header normalization, workbook reading, and the
// schema-mapping boundary where raw cells become typed records.

pub mod headers;
pub mod schema;
pub mod workbook;

use std::fmt;

pub use workbook::{read_sheet, RawSheet};

/// Which of the four source spreadsheets a row or diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFile {
    Primary,
    Categories,
    Processes,
    Dispositions,
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceFile::Primary => "primary base",
            SourceFile::Categories => "category reference",
            SourceFile::Processes => "process reference",
            SourceFile::Dispositions => "disposition reference",
        };
        write!(f, "{}", label)
    }
}
