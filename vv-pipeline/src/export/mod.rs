//! Serializes the enriched table into a single-sheet xlsx workbook.

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;

use crate::common::error::Result;
use crate::ingest::schema::{COL_DEADLINE, COL_OFFICE, COL_PROCESS_ID, COL_SUB_TYPE, COL_TASK_ID};
use crate::processing::enrich::EnrichedTable;

pub const EXPORT_STEM: &str = "BASE_TRATADA_VIAVAREJO";

/// Output order of the derived columns, after the pass-through ones.
pub const ENRICHED_COLUMNS: [&str; 5] =
    ["core_unit", "deadline_minus_one_hour", "reference_flag", "status", "late_marker"];

/// Deadlines are exported as text in this format so a re-parse of the output
/// sees exactly the values the pipeline computed.
pub const DEADLINE_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Dated name for the downloadable artifact.
pub fn export_filename(today: NaiveDate) -> String {
    format!("{}_{}.xlsx", EXPORT_STEM, today.format("%Y-%m-%d"))
}

/// Write the enriched table to xlsx bytes: header row, then one row per
/// enriched task. Column layout is the five canonical primary columns, the
/// pass-through extras, then the derived columns.
pub fn write_workbook(table: &EnrichedTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let mut col: u16 = 0;
    for name in [COL_OFFICE, COL_SUB_TYPE, COL_DEADLINE, COL_PROCESS_ID, COL_TASK_ID] {
        sheet.write_string(0, col, name)?;
        col += 1;
    }
    for name in &table.extra_columns {
        sheet.write_string(0, col, pass_through_header(name))?;
        col += 1;
    }
    for name in ENRICHED_COLUMNS {
        sheet.write_string(0, col, name)?;
        col += 1;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let r = (index + 1) as u32;
        let mut c: u16 = 0;
        let deadline = row.task.sla_deadline.format(DEADLINE_OUTPUT_FORMAT).to_string();
        for value in [
            row.task.office.as_str(),
            row.task.sub_type.as_str(),
            deadline.as_str(),
            row.task.process_id.as_str(),
            row.task.task_id.as_str(),
        ] {
            sheet.write_string(r, c, value)?;
            c += 1;
        }
        for extra_index in 0..table.extra_columns.len() {
            let value = row.task.extras.get(extra_index).map(String::as_str).unwrap_or_default();
            sheet.write_string(r, c, value)?;
            c += 1;
        }
        for value in [
            row.core_unit.as_deref().unwrap_or_default(),
            row.deadline_minus_one_hour.as_str(),
            row.reference_flag.as_deref().unwrap_or_default(),
            row.status.as_deref().unwrap_or_default(),
            row.late_marker(),
        ] {
            sheet.write_string(r, c, value)?;
            c += 1;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// A pass-through column whose name collides with a derived output column is
/// exported under a `_original` suffix; the derived column owns the name.
fn pass_through_header(name: &str) -> String {
    if ENRICHED_COLUMNS.contains(&name) {
        format!("{name}_original")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_carries_the_export_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(export_filename(today), "BASE_TRATADA_VIAVAREJO_2024-03-05.xlsx");
    }

    #[test]
    fn colliding_pass_through_headers_are_renamed() {
        assert_eq!(pass_through_header("status"), "status_original");
        assert_eq!(pass_through_header("comarca"), "comarca");
    }
}
