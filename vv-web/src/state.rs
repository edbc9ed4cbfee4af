use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Shared state across requests: the finished exports, kept in memory only,
/// keyed by the id handed out on the success page.
#[derive(Clone, Default)]
pub struct AppState {
    pub exports: Arc<Mutex<HashMap<Uuid, StoredExport>>>,
}

#[derive(Clone)]
pub struct StoredExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
