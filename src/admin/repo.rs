use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::remote::table::TableClient;
use crate::roles::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAdminRow {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub students_count: i64,
    pub is_published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRef {
    pub role: Role,
}

/// Profile row with its embedded role assignment; either may be absent
/// when the best-effort writes at registration did not land.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileWithRole {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub user_roles: Option<RoleRef>,
}

pub async fn all_courses(tables: &TableClient) -> anyhow::Result<Vec<CourseAdminRow>> {
    tables
        .from("courses")
        .select("id,title,students_count,is_published,created_at")
        .order_desc("created_at")
        .fetch()
        .await
}

pub async fn all_users_with_roles(tables: &TableClient) -> anyhow::Result<Vec<ProfileWithRole>> {
    tables
        .from("user_profiles")
        .select("*,user_roles(role)")
        .fetch()
        .await
}

/// Update-by-predicate on the role table. A user whose role row never
/// landed is left untouched; there is nothing to update.
pub async fn set_role(tables: &TableClient, user_id: Uuid, role: Role) -> anyhow::Result<()> {
    tables
        .update(
            "user_roles",
            &[("user_id", user_id.to_string())],
            &serde_json::json!({ "role": role }),
        )
        .await
}
