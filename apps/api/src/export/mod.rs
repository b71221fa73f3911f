//! Export collaborator: turns a projected table into a shareable location.

pub mod s3;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::table::JobTable;

pub use s3::S3CsvExporter;

/// Implement this to change where finished tables go.
///
/// Carried in `AppState` as `Arc<dyn Exporter>`.
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Persists `table` and returns where it can be fetched from.
    async fn export(&self, table: &JobTable) -> Result<String, AppError>;
}

/// Renders `table` as CSV: a header row of column labels, then one line per row.
/// Fields containing a comma, quote or line break are quoted with `"` doubled.
pub fn render_csv(table: &JobTable) -> String {
    let mut out = String::new();
    push_record(&mut out, table.columns.iter().copied());
    for row in &table.rows {
        push_record(&mut out, row.cells.iter().map(String::as_str));
    }
    out
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}
