use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, warn};
use uuid::Uuid;

use crate::checkout::repo::{self, NewPurchase, PaymentStatus};
use crate::error::ApiError;
use crate::remote::storage::StorageClient;
use crate::remote::table::TableClient;

/// Storage seam for checkout writes.
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn course_price(&self, course_id: Uuid) -> anyhow::Result<Option<f64>>;
    async fn insert_purchase(&self, purchase: &NewPurchase) -> anyhow::Result<()>;
}

#[async_trait]
impl PurchaseStore for TableClient {
    async fn course_price(&self, course_id: Uuid) -> anyhow::Result<Option<f64>> {
        repo::course_price(self, course_id).await
    }

    async fn insert_purchase(&self, purchase: &NewPurchase) -> anyhow::Result<()> {
        repo::insert_purchase(self, purchase).await
    }
}

pub struct ProofFile {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Debug)]
pub struct CreatedPurchase {
    pub id: Uuid,
    pub proof_url: Option<String>,
    pub warnings: Vec<String>,
}

pub(crate) fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

pub(crate) fn proof_key(user_id: Uuid, course_id: Uuid, purchase_id: Uuid, ct: &str) -> String {
    let ext = ext_from_mime(ct).unwrap_or("bin");
    format!("{user_id}/{course_id}-{purchase_id}.{ext}")
}

/// Records a purchase with status `pending`. The amount comes from the
/// course row, never from the caller. A failed proof upload is downgraded
/// to a warning and the purchase is still recorded, mirroring how the
/// registration flow treats its secondary writes.
pub async fn submit_purchase(
    store: &dyn PurchaseStore,
    storage: &dyn StorageClient,
    user_id: Uuid,
    course_id: Uuid,
    payment_method: String,
    proof: Option<ProofFile>,
) -> Result<CreatedPurchase, ApiError> {
    let amount = match store.course_price(course_id).await {
        Ok(Some(price)) => price,
        Ok(None) => return Err(ApiError::NotFound("course")),
        Err(e) => {
            error!(error = %e, %course_id, "course price lookup failed");
            return Err(ApiError::NotFound("course"));
        }
    };

    let purchase_id = Uuid::new_v4();
    let mut warnings = Vec::new();
    let mut proof_url = None;

    if let Some(file) = proof {
        let key = proof_key(user_id, course_id, purchase_id, &file.content_type);
        match storage.upload(&key, file.bytes, &file.content_type).await {
            Ok(()) => proof_url = Some(storage.public_url(&key)),
            Err(e) => {
                warn!(error = %e, %user_id, "proof upload failed; purchase proceeds without proof");
                warnings.push(format!("payment proof upload failed: {e}"));
            }
        }
    }

    let purchase = NewPurchase {
        id: purchase_id,
        user_id,
        course_id,
        amount,
        payment_method,
        payment_status: PaymentStatus::Pending,
        payment_proof_url: proof_url.clone(),
        verification_email_sent: false,
    };
    store
        .insert_purchase(&purchase)
        .await
        .map_err(ApiError::Unexpected)?;

    Ok(CreatedPurchase {
        id: purchase_id,
        proof_url,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubStore {
        price: Option<f64>,
        purchases: Mutex<Vec<NewPurchase>>,
    }

    impl StubStore {
        fn with_price(price: f64) -> Self {
            Self {
                price: Some(price),
                purchases: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PurchaseStore for StubStore {
        async fn course_price(&self, _course_id: Uuid) -> anyhow::Result<Option<f64>> {
            Ok(self.price)
        }

        async fn insert_purchase(&self, purchase: &NewPurchase) -> anyhow::Result<()> {
            self.purchases.lock().unwrap().push(purchase.clone());
            Ok(())
        }
    }

    struct StubStorage {
        fail: bool,
    }

    #[async_trait]
    impl StorageClient for StubStorage {
        async fn upload(&self, _key: &str, _body: Bytes, _ct: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("bucket unavailable");
            }
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://cdn.local/payment-proofs/{key}")
        }
    }

    fn proof() -> ProofFile {
        ProofFile {
            bytes: Bytes::from_static(b"fake image"),
            content_type: "image/png".into(),
        }
    }

    #[tokio::test]
    async fn unknown_course_is_not_found_and_nothing_is_written() {
        let store = StubStore {
            price: None,
            purchases: Mutex::new(Vec::new()),
        };
        let storage = StubStorage { fail: false };
        let err = submit_purchase(
            &store,
            &storage,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "qr".into(),
            Some(proof()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("course")));
        assert!(store.purchases.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn amount_comes_from_the_course_row() {
        let store = StubStore::with_price(149.5);
        let storage = StubStorage { fail: false };
        submit_purchase(&store, &storage, Uuid::new_v4(), Uuid::new_v4(), "bank".into(), None)
            .await
            .unwrap();
        let purchases = store.purchases.lock().unwrap();
        assert_eq!(purchases[0].amount, 149.5);
        assert_eq!(purchases[0].payment_status, PaymentStatus::Pending);
        assert!(!purchases[0].verification_email_sent);
    }

    #[tokio::test]
    async fn proof_upload_records_the_public_url() {
        let store = StubStore::with_price(49.0);
        let storage = StubStorage { fail: false };
        let created = submit_purchase(
            &store,
            &storage,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "qr".into(),
            Some(proof()),
        )
        .await
        .unwrap();
        assert!(created.warnings.is_empty());
        let url = created.proof_url.expect("proof url should be set");
        assert!(url.starts_with("https://cdn.local/payment-proofs/"));
        assert_eq!(
            store.purchases.lock().unwrap()[0].payment_proof_url.as_deref(),
            Some(url.as_str())
        );
    }

    #[tokio::test]
    async fn failed_upload_still_records_the_purchase() {
        let store = StubStore::with_price(49.0);
        let storage = StubStorage { fail: true };
        let created = submit_purchase(
            &store,
            &storage,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "qr".into(),
            Some(proof()),
        )
        .await
        .unwrap();
        assert_eq!(created.warnings.len(), 1);
        assert!(created.warnings[0].contains("upload failed"));
        assert!(created.proof_url.is_none());
        let purchases = store.purchases.lock().unwrap();
        assert_eq!(purchases.len(), 1);
        assert!(purchases[0].payment_proof_url.is_none());
    }

    #[test]
    fn ext_from_mime_known_types() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("application/pdf"), Some("pdf"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn proof_key_layout() {
        let user = Uuid::new_v4();
        let course = Uuid::new_v4();
        let purchase = Uuid::new_v4();
        let key = proof_key(user, course, purchase, "image/png");
        assert_eq!(key, format!("{user}/{course}-{purchase}.png"));
        let fallback = proof_key(user, course, purchase, "text/plain");
        assert!(fallback.ends_with(".bin"));
    }
}
