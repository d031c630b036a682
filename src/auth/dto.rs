use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::services::SecondaryWarning;
use crate::remote::identity::Identity;
use crate::roles::Role;

/// Request body for user registration. Absent fields deserialize empty so
/// they fail input validation rather than body parsing.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

/// Returned after registration, also when the profile or role write only
/// partially succeeded; `warnings` carries what did not land.
#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub success: bool,
    pub user: Identity,
    pub message: String,
    pub warnings: Vec<SecondaryWarning>,
}

/// Identity of the bearer. Profile fields are null when the best-effort
/// profile write never landed.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
}
