use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::remote::table::TableClient;

/// Access level attached one-to-one to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn can_teach(self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }

    pub fn can_administer(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// No role row, an unknown role value, and a failed lookup all mean no
/// elevated access.
pub fn teaching_allowed(role: Option<Role>) -> bool {
    role.is_some_and(Role::can_teach)
}

pub fn admin_allowed(role: Option<Role>) -> bool {
    role.is_some_and(Role::can_administer)
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: Role,
}

/// The single lookup every gated screen resolves the caller's role through.
pub async fn resolve_role(tables: &TableClient, user_id: Uuid) -> Option<Role> {
    match tables
        .from("user_roles")
        .select("role")
        .eq("user_id", user_id)
        .fetch_one::<RoleRow>()
        .await
    {
        Ok(row) => row.map(|r| r.role),
        Err(e) => {
            warn!(error = %e, %user_id, "role lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_role_grants_nothing() {
        assert!(!teaching_allowed(None));
        assert!(!admin_allowed(None));
    }

    #[test]
    fn student_grants_nothing() {
        assert!(!teaching_allowed(Some(Role::Student)));
        assert!(!admin_allowed(Some(Role::Student)));
    }

    #[test]
    fn teacher_grants_teaching_but_not_admin() {
        assert!(teaching_allowed(Some(Role::Teacher)));
        assert!(!admin_allowed(Some(Role::Teacher)));
    }

    #[test]
    fn admin_grants_both() {
        assert!(teaching_allowed(Some(Role::Admin)));
        assert!(admin_allowed(Some(Role::Admin)));
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn unknown_role_value_fails_to_parse() {
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }
}
