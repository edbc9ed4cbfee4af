use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};
use tracing::debug;

use crate::common::error::{PipelineError, Result};
use crate::ingest::headers::clean_header;
use crate::ingest::SourceFile;

/// The first worksheet of one uploaded workbook: normalized header row plus
/// raw data cells. Cells stay as [`calamine::Data`] so Excel-native datetime
/// values keep their meaning until the schema boundary coerces them.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub source: SourceFile,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

/// Open an xlsx byte buffer and pull its first worksheet into a [`RawSheet`].
///
/// Rows whose cells are all blank are skipped; spreadsheets exported by hand
/// routinely carry trailing empty rows.
pub fn read_sheet(bytes: &[u8], source: SourceFile) -> Result<RawSheet> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| PipelineError::Workbook { file: source, source: e })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(PipelineError::NoWorksheet { file: source })?
        .map_err(|e| PipelineError::Workbook { file: source, source: e })?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| clean_header(&cell_text(cell))).collect())
        .unwrap_or_default();

    let rows: Vec<Vec<Data>> = rows
        .filter(|row| row.iter().any(|cell| !cell_text(cell).trim().is_empty()))
        .map(|row| row.to_vec())
        .collect();

    debug!(file = %source, columns = headers.len(), rows = rows.len(), "worksheet loaded");

    Ok(RawSheet { source, headers, rows })
}

/// Display text for one cell; empty string for blank cells.
pub fn cell_text(cell: &Data) -> String {
    cell.as_string().unwrap_or_else(|| cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bytes_that_are_not_a_workbook() {
        let err = read_sheet(b"definitely not a zip archive", SourceFile::Primary).unwrap_err();
        assert!(matches!(err, PipelineError::Workbook { file: SourceFile::Primary, .. }));
    }
}
