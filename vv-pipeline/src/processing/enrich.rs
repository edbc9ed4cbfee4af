//! The enrichment pipeline: office filter, lookup joins against the three
//! reference tables, and the two derived deadline fields.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vv_core::{CategoryEntry, DispositionEntry, ProcessEntry, TaskRecord, TaskTable};

/// Only tasks owned by this office are processed; everything else is dropped.
pub const OFFICE: &str = "QUEIROZ CAVALCANTI ADVOGADOS";

/// Status written onto late rows that carry no disposition.
pub const LATE_STATUS: &str = "LATE - MUST BE JUSTIFIED!";

/// Hour of the daily lateness cutoff, on the calendar day of the run.
pub const CUTOFF_HOUR: u32 = 8;

/// One task row after enrichment. Join misses are `None`, never sentinel
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedTask {
    pub task: TaskRecord,
    pub core_unit: Option<String>,
    pub deadline_minus_one_hour: String,
    pub late: bool,
    pub reference_flag: Option<String>,
    pub status: Option<String>,
}

impl EnrichedTask {
    /// The lateness flag as it appears in the exported sheet.
    pub fn late_marker(&self) -> &'static str {
        if self.late {
            "-"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedTable {
    pub extra_columns: Vec<String>,
    pub rows: Vec<EnrichedTask>,
}

/// Run the full enrichment over the primary table.
///
/// `now` is the instant the run was triggered; the lateness cutoff is that
/// instant's calendar day at 08:00. Passing it in keeps the transform
/// deterministic under test.
///
/// Row cardinality is preserved except for duplicate identifiers in the
/// process reference, which multiply their matching rows.
pub fn enrich(
    primary: &TaskTable,
    categories: &[CategoryEntry],
    processes: &[ProcessEntry],
    dispositions: &[DispositionEntry],
    now: NaiveDateTime,
) -> EnrichedTable {
    let units = first_unit_by_sub_type(categories);
    let statuses = first_status_by_task(dispositions);
    let cutoff = daily_cutoff(now);

    let mut rows = Vec::with_capacity(primary.rows.len());
    for task in primary.rows.iter().filter(|task| task.office == OFFICE) {
        let core_unit = units.get(task.sub_type.as_str()).map(|unit| (*unit).to_string());
        let deadline_minus_one_hour =
            (task.sla_deadline - Duration::hours(1)).format("%H:%M").to_string();
        let late = task.sla_deadline <= cutoff;

        // Set-membership join: every matching identifier yields one output
        // row; a duplicate identifier in the reference multiplies the row.
        let reference_flags: Vec<Option<String>> = if task.process_id.is_empty() {
            vec![None]
        } else {
            let matches: Vec<Option<String>> = processes
                .iter()
                .filter(|entry| entry.npc == task.process_id)
                .map(|entry| Some(entry.npc.clone()))
                .collect();
            if matches.is_empty() {
                vec![None]
            } else {
                matches
            }
        };

        for reference_flag in reference_flags {
            let mut status = statuses.get(task.task_id.as_str()).map(|s| (*s).to_string());
            if status.is_none() && late {
                status = Some(LATE_STATUS.to_string());
            }
            rows.push(EnrichedTask {
                task: task.clone(),
                core_unit: core_unit.clone(),
                deadline_minus_one_hour: deadline_minus_one_hour.clone(),
                late,
                reference_flag,
                status,
            });
        }
    }

    debug!(input = primary.rows.len(), output = rows.len(), "enrichment finished");

    EnrichedTable { extra_columns: primary.extra_columns.clone(), rows }
}

fn daily_cutoff(now: NaiveDateTime) -> NaiveDateTime {
    now.date()
        .and_hms_opt(CUTOFF_HOUR, 0, 0)
        .expect("cutoff hour is a valid wall-clock time")
}

fn first_unit_by_sub_type(categories: &[CategoryEntry]) -> HashMap<&str, &str> {
    let mut units = HashMap::new();
    for entry in categories {
        units.entry(entry.sub_type.as_str()).or_insert(entry.unit.as_str());
    }
    if units.len() < categories.len() {
        warn!(
            dropped = categories.len() - units.len(),
            "duplicate sub-types in the category reference, keeping first occurrence"
        );
    }
    units
}

fn first_status_by_task(dispositions: &[DispositionEntry]) -> HashMap<&str, &str> {
    let mut statuses = HashMap::new();
    for entry in dispositions {
        statuses.entry(entry.task_id.as_str()).or_insert(entry.status.as_str());
    }
    statuses
}
