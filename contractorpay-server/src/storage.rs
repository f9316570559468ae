//! Receipt image store
//!
//! Thin REST client for the S3-compatible bucket receipts live in.
//! Uploads are best-effort: the ledger write goes ahead whether or not
//! the image made it, and a failure is captured as a value rather than
//! an error so the caller can pass it straight into the insert.

use reqwest::Client;
use uuid::Uuid;

use contractorpay_core::config::ReceiptStoreConfig;
use contractorpay_core::models::ReceiptUpload;

/// Upload timeout; the ledger write should never wait long on the store.
const UPLOAD_TIMEOUT_SECS: u64 = 10;

/// Client for the receipt bucket.
#[derive(Clone)]
pub struct ReceiptStore {
    config: ReceiptStoreConfig,
    client: Client,
}

impl ReceiptStore {
    pub fn new(config: ReceiptStoreConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    /// Upload a receipt image under a generated key.
    ///
    /// Returns `Skipped` when the store is disabled or no image was sent,
    /// `Failed` (already logged) when the store is unreachable or rejects
    /// the object. Neither blocks the transaction write.
    pub async fn upload(&self, image: Option<(String, Vec<u8>)>) -> ReceiptUpload {
        let Some((filename, bytes)) = image else {
            return ReceiptUpload::Skipped;
        };

        if !self.config.enabled || bytes.is_empty() {
            return ReceiptUpload::Skipped;
        }

        let key = object_key(&filename);
        let url = format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            key
        );

        let result = self
            .client
            .put(&url)
            .bearer_auth(&self.config.api_token)
            .body(bytes)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                let public_url = format!(
                    "{}/{}",
                    self.config.public_base_url.trim_end_matches('/'),
                    key
                );
                tracing::debug!(key = %key, "Receipt uploaded");
                ReceiptUpload::Uploaded(public_url)
            }
            Ok(response) => {
                tracing::warn!(
                    status = %response.status(),
                    key = %key,
                    "Receipt upload rejected, recording transaction without image"
                );
                ReceiptUpload::Failed
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    key = %key,
                    "Receipt upload failed, recording transaction without image"
                );
                ReceiptUpload::Failed
            }
        }
    }
}

/// Generated object key: receipts/<uuid>.<ext>, falling back to "bin"
/// when the filename carries no usable extension.
fn object_key(filename: &str) -> String {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && !ext.contains('/'))
        .unwrap_or("bin");

    format!("receipts/{}.{}", Uuid::new_v4(), ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_keeps_extension() {
        let key = object_key("invoice.PNG");
        assert!(key.starts_with("receipts/"));
        assert!(key.ends_with(".png"));

        // Last segment wins for multi-dot names
        assert!(object_key("scan.2024.jpeg").ends_with(".jpeg"));
    }

    #[test]
    fn key_falls_back_without_extension() {
        assert!(object_key("receipt").ends_with(".bin"));
        assert!(object_key("receipt.").ends_with(".bin"));
    }

    #[test]
    fn keys_are_unique() {
        assert_ne!(object_key("a.jpg"), object_key("a.jpg"));
    }

    #[tokio::test]
    async fn disabled_store_skips() {
        let store = ReceiptStore::new(ReceiptStoreConfig {
            enabled: false,
            endpoint: String::new(),
            bucket: "receipts".into(),
            api_token: String::new(),
            public_base_url: String::new(),
        });

        let outcome = store.upload(Some(("a.png".into(), vec![1, 2, 3]))).await;
        assert_eq!(outcome, ReceiptUpload::Skipped);
    }

    #[tokio::test]
    async fn missing_image_skips() {
        let store = ReceiptStore::new(ReceiptStoreConfig {
            enabled: true,
            endpoint: "http://localhost:9".into(),
            bucket: "receipts".into(),
            api_token: String::new(),
            public_base_url: String::new(),
        });

        assert_eq!(store.upload(None).await, ReceiptUpload::Skipped);
    }

    #[tokio::test]
    async fn unreachable_store_is_failed_not_error() {
        // Port 9 (discard) refuses connections on most hosts
        let store = ReceiptStore::new(ReceiptStoreConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:9".into(),
            bucket: "receipts".into(),
            api_token: "token".into(),
            public_base_url: "http://127.0.0.1:9/public".into(),
        });

        let outcome = store.upload(Some(("a.png".into(), vec![1]))).await;
        assert_eq!(outcome, ReceiptUpload::Failed);
    }
}
