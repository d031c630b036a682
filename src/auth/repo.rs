use serde::Deserialize;
use uuid::Uuid;

use crate::remote::table::TableClient;

/// Profile row from the remote service. May be absent when the best-effort
/// write during registration never landed.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

pub async fn fetch_profile(
    tables: &TableClient,
    user_id: Uuid,
) -> anyhow::Result<Option<ProfileRow>> {
    tables
        .from("user_profiles")
        .select("id,email,full_name")
        .eq("id", user_id)
        .fetch_one()
        .await
}
