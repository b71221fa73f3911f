use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{render_csv, Exporter};
use crate::table::JobTable;

/// Uploads the table as UTF-8 CSV to object storage (MinIO locally, S3 in production).
#[derive(Clone)]
pub struct S3CsvExporter {
    client: S3Client,
    bucket: String,
    endpoint: String,
}

impl S3CsvExporter {
    pub fn new(client: S3Client, bucket: String, endpoint: String) -> Self {
        Self {
            client,
            bucket,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn location(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}

pub fn export_key(at: DateTime<Utc>, id: Uuid) -> String {
    format!("exports/import_{}_{id}.csv", at.format("%Y%m%d_%H%M%S"))
}

#[async_trait]
impl Exporter for S3CsvExporter {
    async fn export(&self, table: &JobTable) -> Result<String, AppError> {
        let key = export_key(Utc::now(), Uuid::new_v4());
        let csv = render_csv(table);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(csv.into_bytes()))
            .content_type("text/csv; charset=utf-8")
            .send()
            .await
            .map_err(|e| AppError::Export(format!("S3 upload failed: {e}")))?;

        info!(
            "Uploaded {} rows to s3://{}/{}",
            table.rows.len(),
            self.bucket,
            key
        );
        Ok(self.location(&key))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_export_key_layout() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let id = Uuid::nil();
        assert_eq!(
            export_key(at, id),
            "exports/import_20240309_070501_00000000-0000-0000-0000-000000000000.csv"
        );
    }
}
