use thiserror::Error;

use crate::ingest::SourceFile;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("could not read the {file} spreadsheet: {source}")]
    Workbook {
        file: SourceFile,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("the {file} spreadsheet has no worksheet")]
    NoWorksheet { file: SourceFile },

    #[error("the {file} spreadsheet is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        file: SourceFile,
        columns: Vec<&'static str>,
    },

    #[error("row {row} of the {file} spreadsheet has an unparseable deadline: '{value}'")]
    BadDeadline {
        file: SourceFile,
        row: usize,
        value: String,
    },

    #[error("failed to serialize the output spreadsheet: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
