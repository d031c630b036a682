use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::remote::table::TableClient;

/// Purchase lifecycle. Transitions past `pending` happen externally,
/// through manual verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodRow {
    pub id: Uuid,
    pub method_name: String,
    pub method_type: String,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    pub is_active: bool,
}

/// Purchase row as submitted by checkout. The id is generated here so the
/// caller can reference the purchase without reading it back.
#[derive(Debug, Clone, Serialize)]
pub struct NewPurchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub payment_proof_url: Option<String>,
    pub verification_email_sent: bool,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    price: f64,
}

pub async fn active_payment_methods(
    tables: &TableClient,
) -> anyhow::Result<Vec<PaymentMethodRow>> {
    tables
        .from("payment_methods")
        .eq("is_active", true)
        .fetch()
        .await
}

pub async fn course_price(tables: &TableClient, course_id: Uuid) -> anyhow::Result<Option<f64>> {
    let row = tables
        .from("courses")
        .select("price")
        .eq("id", course_id)
        .fetch_one::<PriceRow>()
        .await?;
    Ok(row.map(|r| r.price))
}

pub async fn insert_purchase(tables: &TableClient, purchase: &NewPurchase) -> anyhow::Result<()> {
    tables.insert("purchases", purchase).await
}
