use askama::Template;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::Local;
use tracing::{info, warn};
use uuid::Uuid;

use vv_pipeline::export::{export_filename, write_workbook};
use vv_pipeline::ingest::{read_sheet, schema, SourceFile};
use vv_pipeline::processing::enrich::enrich;

use crate::state::{AppState, StoredExport};
use crate::templates::{IndexTemplate, ResultTemplate};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn index() -> impl IntoResponse {
    render(IndexTemplate { errors: Vec::new() })
}

pub async fn process(State(state): State<AppState>, mut multipart: Multipart) -> Html<String> {
    let mut uploads: [Option<axum::body::Bytes>; 4] = [None, None, None, None];
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let slot = match field.name() {
                    Some("primary") => 0,
                    Some("categories") => 1,
                    Some("processes") => 2,
                    Some("dispositions") => 3,
                    _ => continue,
                };
                match field.bytes().await {
                    Ok(data) => uploads[slot] = Some(data),
                    Err(e) => return error_page(vec![format!("upload failed: {}", e)]),
                }
            }
            Ok(None) => break,
            Err(e) => return error_page(vec![format!("upload failed: {}", e)]),
        }
    }
    let [Some(primary), Some(categories), Some(processes), Some(dispositions)] = uploads else {
        return error_page(vec!["all four spreadsheets are required".to_string()]);
    };

    // Validate all four files before any join runs, so one submission
    // surfaces every diagnostic it can.
    let primary =
        read_sheet(&primary, SourceFile::Primary).and_then(|sheet| schema::primary_table(&sheet));
    let categories = read_sheet(&categories, SourceFile::Categories)
        .and_then(|sheet| schema::category_entries(&sheet));
    let processes = read_sheet(&processes, SourceFile::Processes)
        .and_then(|sheet| schema::process_entries(&sheet));
    let dispositions = read_sheet(&dispositions, SourceFile::Dispositions)
        .and_then(|sheet| schema::disposition_entries(&sheet));

    let (primary, categories, processes, dispositions) =
        match (primary, categories, processes, dispositions) {
            (Ok(primary), Ok(categories), Ok(processes), Ok(dispositions)) => {
                (primary, categories, processes, dispositions)
            }
            (primary, categories, processes, dispositions) => {
                let errors: Vec<String> = [
                    primary.err().map(|e| e.to_string()),
                    categories.err().map(|e| e.to_string()),
                    processes.err().map(|e| e.to_string()),
                    dispositions.err().map(|e| e.to_string()),
                ]
                .into_iter()
                .flatten()
                .collect();
                warn!(diagnostics = errors.len(), "submission rejected");
                return error_page(errors);
            }
        };

    let now = Local::now().naive_local();
    let enriched = enrich(&primary, &categories, &processes, &dispositions, now);
    let bytes = match write_workbook(&enriched) {
        Ok(bytes) => bytes,
        Err(e) => return error_page(vec![e.to_string()]),
    };

    let filename = export_filename(now.date());
    let id = Uuid::new_v4();
    let row_count = enriched.rows.len();
    state
        .exports
        .lock()
        .await
        .insert(id, StoredExport { filename: filename.clone(), bytes });
    info!(%id, rows = row_count, "base processed");

    render(ResultTemplate {
        filename,
        row_count,
        download_url: format!("/download/{}", id),
    })
}

pub async fn download(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let exports = state.exports.lock().await;
    match exports.get(&id) {
        Some(export) => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.filename),
                ),
            ],
            export.bytes.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "export not found").into_response(),
    }
}

fn render<T: Template>(template: T) -> Html<String> {
    Html(template.render().expect("Template rendering failed"))
}

fn error_page(errors: Vec<String>) -> Html<String> {
    render(IndexTemplate { errors })
}
