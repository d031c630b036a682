use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::checkout::repo::PaymentStatus;
use crate::remote::table::TableClient;

/// Course fields embedded in an enrollment read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrolledCourseRef {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    /// Percent complete, 0–100.
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub courses: Option<EnrolledCourseRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedCourseRef {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_proof_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub courses: Option<PurchasedCourseRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    View,
    Complete,
    Download,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_type: ActivityKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn enrollments_for_user(
    tables: &TableClient,
    user_id: Uuid,
) -> anyhow::Result<Vec<EnrollmentRow>> {
    tables
        .from("enrollments")
        .select("*,courses(id,title,thumbnail_url,duration_hours)")
        .eq("user_id", user_id)
        .order_desc("created_at")
        .fetch()
        .await
}

pub async fn purchases_for_user(
    tables: &TableClient,
    user_id: Uuid,
) -> anyhow::Result<Vec<PurchaseRow>> {
    tables
        .from("purchases")
        .select("*,courses(id,title,price)")
        .eq("user_id", user_id)
        .order_desc("created_at")
        .fetch()
        .await
}

pub async fn recent_activity(
    tables: &TableClient,
    user_id: Uuid,
) -> anyhow::Result<Vec<ActivityRow>> {
    tables
        .from("user_activity")
        .eq("user_id", user_id)
        .order_desc("created_at")
        .limit(10)
        .fetch()
        .await
}
