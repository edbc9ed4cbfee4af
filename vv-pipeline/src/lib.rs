//! Everything between raw spreadsheet bytes and the treated output workbook:
//! header normalization, workbook reading, the schema-mapping boundary, the
//! enrichment pipeline itself, and the xlsx export.

pub mod common;
pub mod export;
pub mod ingest;
pub mod processing;
