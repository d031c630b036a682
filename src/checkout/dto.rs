use serde::Serialize;
use uuid::Uuid;

use crate::checkout::repo::PaymentStatus;

#[derive(Debug, Serialize)]
pub struct CreatedPurchaseResponse {
    pub id: Uuid,
    pub payment_status: PaymentStatus,
    pub proof_url: Option<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_purchase_response_shape() {
        let resp = CreatedPurchaseResponse {
            id: Uuid::new_v4(),
            payment_status: PaymentStatus::Pending,
            proof_url: None,
            warnings: vec!["payment proof upload failed: bucket unavailable".into()],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["payment_status"], "pending");
        assert_eq!(json["warnings"].as_array().unwrap().len(), 1);
    }
}
