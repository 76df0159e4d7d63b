//! Edition Storage — persists rendered PDFs.
//!
//! Production uses S3 (or MinIO locally); tests swap in `MemoryEditionStore`
//! through the `Arc<dyn EditionStore>` in `AppState`.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::NaiveDate;
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait EditionStore: Send + Sync {
    async fn put_pdf(&self, key: &str, bytes: Bytes) -> Result<(), AppError>;
}

/// Object key for a rendered edition: `epapers/{date}/{template_id}-{edition}.pdf`.
/// The edition label is slugged so it is safe in a key.
pub fn edition_key(date: NaiveDate, template_id: &str, edition: &str) -> String {
    format!("epapers/{date}/{template_id}-{}.pdf", slug(edition))
}

fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "edition".to_string()
    } else {
        trimmed.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// S3
// ────────────────────────────────────────────────────────────────────────────

pub struct S3EditionStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3EditionStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl EditionStore for S3EditionStore {
    async fn put_pdf(&self, key: &str, bytes: Bytes) -> Result<(), AppError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!(size, "Uploaded e-paper to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[derive(Default)]
pub struct MemoryEditionStore {
    pub objects: std::sync::Mutex<std::collections::BTreeMap<String, Bytes>>,
}

#[cfg(test)]
#[async_trait]
impl EditionStore for MemoryEditionStore {
    async fn put_pdf(&self, key: &str, bytes: Bytes) -> Result<(), AppError> {
        self.objects
            .lock()
            .map_err(|_| AppError::Storage("store lock poisoned".to_string()))?
            .insert(key.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edition_key_layout() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            edition_key(date, "bangladesh-premium", "Dhaka Edition"),
            "epapers/2024-03-01/bangladesh-premium-dhaka-edition.pdf"
        );
    }

    #[test]
    fn test_slug_falls_back_for_non_ascii_labels() {
        assert_eq!(slug("ঢাকা সংস্করণ"), "edition");
        assert_eq!(slug("  Late -- City  "), "late-city");
    }

    #[tokio::test]
    async fn test_memory_store_keeps_bytes() {
        let store = MemoryEditionStore::default();
        store
            .put_pdf("k.pdf", Bytes::from_static(b"%PDF-1.7"))
            .await
            .unwrap();
        let objects = store.objects.lock().unwrap();
        assert_eq!(objects["k.pdf"], Bytes::from_static(b"%PDF-1.7"));
    }
}
