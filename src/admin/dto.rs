use serde::Deserialize;

use crate::roles::Role;

/// Body for role assignment; only known roles deserialize.
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_parse() {
        let req: AssignRoleRequest = serde_json::from_str(r#"{"role":"teacher"}"#).unwrap();
        assert_eq!(req.role, Role::Teacher);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<AssignRoleRequest>(r#"{"role":"owner"}"#).is_err());
    }
}
