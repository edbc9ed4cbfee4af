//! The schema-mapping boundary: raw worksheet cells are validated and coerced
//! into the typed domain records here, and nowhere else downstream.

use calamine::{Data, DataType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use vv_core::{CategoryEntry, DispositionEntry, ProcessEntry, TaskRecord, TaskTable};

use crate::common::error::{PipelineError, Result};
use crate::ingest::workbook::{cell_text, RawSheet};

// Canonical column keys, post header normalization.
pub const COL_OFFICE: &str = "escritorio_";
pub const COL_SUB_TYPE: &str = "sub_tipo";
pub const COL_DEADLINE: &str = "prazo_sla_";
pub const COL_PROCESS_ID: &str = "_processo_id";
pub const COL_TASK_ID: &str = "id_da_tarefa_";
pub const COL_CATEGORY_TYPE: &str = "tipo";
pub const COL_CATEGORY_UNIT: &str = "nucleo";
pub const COL_NPC: &str = "npc";
pub const COL_STATUS: &str = "status";

/// Text-cell formats accepted for `prazo_sla_` when the cell is not an
/// Excel-native datetime.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Map the primary worksheet into the typed task table.
///
/// The five join/derive columns are required; every other column becomes a
/// pass-through extra, in source order. An unparseable deadline is fatal for
/// the whole run.
pub fn primary_table(sheet: &RawSheet) -> Result<TaskTable> {
    let idx = required_columns(
        sheet,
        &[COL_OFFICE, COL_SUB_TYPE, COL_DEADLINE, COL_PROCESS_ID, COL_TASK_ID],
    )?;
    let extra_idx: Vec<usize> = (0..sheet.headers.len()).filter(|i| !idx.contains(i)).collect();
    let extra_columns: Vec<String> = extra_idx.iter().map(|&i| sheet.headers[i].clone()).collect();

    let mut rows = Vec::with_capacity(sheet.rows.len());
    for (offset, row) in sheet.rows.iter().enumerate() {
        // +2: one for the header row, one for 1-based spreadsheet numbering.
        let row_number = offset + 2;
        rows.push(TaskRecord {
            office: text_at(row, idx[0]),
            sub_type: text_at(row, idx[1]),
            sla_deadline: parse_deadline(row.get(idx[2]), sheet, row_number)?,
            process_id: text_at(row, idx[3]),
            task_id: text_at(row, idx[4]),
            extras: extra_idx.iter().map(|&i| text_at(row, i)).collect(),
        });
    }

    Ok(TaskTable { extra_columns, rows })
}

/// Map the category worksheet into `(sub_type, unit)` entries. Rows with a
/// blank sub-type are skipped.
pub fn category_entries(sheet: &RawSheet) -> Result<Vec<CategoryEntry>> {
    let idx = required_columns(sheet, &[COL_CATEGORY_TYPE, COL_CATEGORY_UNIT])?;
    Ok(sheet
        .rows
        .iter()
        .filter_map(|row| {
            let sub_type = text_at(row, idx[0]);
            if sub_type.is_empty() {
                return None;
            }
            Some(CategoryEntry { sub_type, unit: text_at(row, idx[1]) })
        })
        .collect())
}

/// Map the process worksheet into its identifier-only projection. Blank
/// identifiers are skipped; duplicates are kept as-is.
pub fn process_entries(sheet: &RawSheet) -> Result<Vec<ProcessEntry>> {
    let idx = required_columns(sheet, &[COL_NPC])?;
    Ok(sheet
        .rows
        .iter()
        .filter_map(|row| {
            let npc = text_at(row, idx[0]);
            if npc.is_empty() {
                return None;
            }
            Some(ProcessEntry { npc })
        })
        .collect())
}

/// Map the disposition worksheet into `(task_id, status)` entries. Rows with
/// a blank task identifier are skipped.
pub fn disposition_entries(sheet: &RawSheet) -> Result<Vec<DispositionEntry>> {
    let idx = required_columns(sheet, &[COL_TASK_ID, COL_STATUS])?;
    Ok(sheet
        .rows
        .iter()
        .filter_map(|row| {
            let task_id = text_at(row, idx[0]);
            if task_id.is_empty() {
                return None;
            }
            Some(DispositionEntry { task_id, status: text_at(row, idx[1]) })
        })
        .collect())
}

/// Resolve every wanted column to its index, reporting ALL absent columns for
/// this file in a single diagnostic.
fn required_columns(sheet: &RawSheet, wanted: &[&'static str]) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(wanted.len());
    let mut missing = Vec::new();
    for name in wanted {
        match sheet.headers.iter().position(|h| h == name) {
            Some(i) => indices.push(i),
            None => missing.push(*name),
        }
    }
    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(PipelineError::MissingColumns { file: sheet.source, columns: missing })
    }
}

fn text_at(row: &[Data], index: usize) -> String {
    row.get(index).map(cell_text).unwrap_or_default()
}

fn parse_deadline(cell: Option<&Data>, sheet: &RawSheet, row_number: usize) -> Result<NaiveDateTime> {
    if let Some(cell) = cell {
        if let Some(dt) = cell.as_datetime() {
            return Ok(dt);
        }
        if let Data::String(raw) | Data::DateTimeIso(raw) = cell {
            if let Some(dt) = parse_deadline_text(raw.trim()) {
                return Ok(dt);
            }
        }
    }
    Err(PipelineError::BadDeadline {
        file: sheet.source,
        row: row_number,
        value: cell.map(cell_text).unwrap_or_default(),
    })
}

fn parse_deadline_text(raw: &str) -> Option<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::SourceFile;

    fn sheet(source: SourceFile, headers: &[&str], rows: Vec<Vec<Data>>) -> RawSheet {
        RawSheet {
            source,
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn reports_every_missing_primary_column_at_once() {
        let sheet = sheet(SourceFile::Primary, &[COL_OFFICE, COL_SUB_TYPE, "outra"], Vec::new());
        let err = primary_table(&sheet).unwrap_err();
        match err {
            PipelineError::MissingColumns { file, columns } => {
                assert_eq!(file, SourceFile::Primary);
                assert_eq!(columns, vec![COL_DEADLINE, COL_PROCESS_ID, COL_TASK_ID]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn splits_required_and_pass_through_columns() {
        let sheet = sheet(
            SourceFile::Primary,
            &[COL_OFFICE, "comarca", COL_SUB_TYPE, COL_DEADLINE, COL_PROCESS_ID, COL_TASK_ID],
            vec![vec![
                text("QUEIROZ CAVALCANTI ADVOGADOS"),
                text("Recife"),
                text("Audiência"),
                text("2024-01-01 09:00"),
                text("P1"),
                text("T1"),
            ]],
        );
        let table = primary_table(&sheet).unwrap();
        assert_eq!(table.extra_columns, vec!["comarca".to_string()]);
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.extras, vec!["Recife".to_string()]);
        assert_eq!(row.sub_type, "Audiência");
        assert_eq!(row.process_id, "P1");
        assert_eq!(row.task_id, "T1");
    }

    #[test]
    fn parses_text_deadlines_in_common_formats() {
        for (raw, expected) in [
            ("2024-01-01 09:00", "2024-01-01T09:00:00"),
            ("2024-01-01 09:00:30", "2024-01-01T09:00:30"),
            ("01/02/2024 07:30", "2024-02-01T07:30:00"),
            ("2024-01-01", "2024-01-01T00:00:00"),
        ] {
            let parsed = parse_deadline_text(raw).unwrap();
            assert_eq!(parsed.format("%Y-%m-%dT%H:%M:%S").to_string(), expected, "input {raw}");
        }
    }

    #[test]
    fn unparseable_deadline_is_fatal_and_names_the_row() {
        let sheet = sheet(
            SourceFile::Primary,
            &[COL_OFFICE, COL_SUB_TYPE, COL_DEADLINE, COL_PROCESS_ID, COL_TASK_ID],
            vec![
                vec![text("QCA"), text("A"), text("2024-01-01 09:00"), text("P1"), text("T1")],
                vec![text("QCA"), text("A"), text("amanhã cedo"), text("P2"), text("T2")],
            ],
        );
        let err = primary_table(&sheet).unwrap_err();
        match err {
            PipelineError::BadDeadline { file, row, value } => {
                assert_eq!(file, SourceFile::Primary);
                assert_eq!(row, 3);
                assert_eq!(value, "amanhã cedo");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reference_projections_skip_blank_keys() {
        let categories = sheet(
            SourceFile::Categories,
            &[COL_CATEGORY_TYPE, COL_CATEGORY_UNIT],
            vec![
                vec![text("A"), text("U1")],
                vec![Data::Empty, text("U2")],
            ],
        );
        assert_eq!(category_entries(&categories).unwrap().len(), 1);

        let processes = sheet(
            SourceFile::Processes,
            &[COL_NPC],
            vec![vec![text("P1")], vec![text("")], vec![text("P1")]],
        );
        let entries = process_entries(&processes).unwrap();
        assert_eq!(entries.len(), 2, "duplicates are kept, blanks are not");

        let dispositions = sheet(
            SourceFile::Dispositions,
            &[COL_TASK_ID, COL_STATUS],
            vec![vec![text("T1"), text("cancelamento")], vec![Data::Empty, text("x")]],
        );
        assert_eq!(disposition_entries(&dispositions).unwrap().len(), 1);
    }
}
