use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the primary base after header normalization and cell coercion.
///
/// The five fields the pipeline joins and derives on are typed; every other
/// source column rides along in `extras`, aligned with the owning table's
/// `extra_columns` so pass-through data keeps its order through to the export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub office: String,
    pub sub_type: String,
    pub sla_deadline: NaiveDateTime,
    pub process_id: String,
    pub task_id: String,
    pub extras: Vec<String>,
}

/// The primary base: pass-through column names plus one record per data row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTable {
    pub extra_columns: Vec<String>,
    pub rows: Vec<TaskRecord>,
}

/// One row of the category reference: task sub-type to organizational unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub sub_type: String,
    pub unit: String,
}

/// One known external process identifier from the process reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub npc: String,
}

/// One row of the disposition reference: task identifier to terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispositionEntry {
    pub task_id: String,
    pub status: String,
}
