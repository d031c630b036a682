use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload for a new auth identity. The full name travels as user metadata
/// so the auth record alone is enough for login.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Identity record as returned by the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The admin API answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The call never completed or returned garbage (outage, timeout).
    #[error("auth service call failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityAdmin: Send + Sync {
    async fn create_identity(&self, new: &NewIdentity) -> Result<Identity, IdentityError>;
}

/// Client for the remote service's admin auth endpoint.
pub struct AuthAdminClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

impl AuthAdminClient {
    pub fn new(base_url: &str, service_key: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build auth admin client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }
}

#[async_trait]
impl IdentityAdmin for AuthAdminClient {
    async fn create_identity(&self, new: &NewIdentity) -> Result<Identity, IdentityError> {
        let body = serde_json::json!({
            "email": new.email,
            "password": new.password,
            "email_confirm": true,
            "user_metadata": { "full_name": new.full_name },
        });
        let resp = self
            .http
            .post(format!("{}/auth/v1/admin/users", self.base_url))
            .bearer_auth(&self.service_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .or_else(|| v.get("msg"))
                        .or_else(|| v.get("error"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "identity creation failed".to_string());
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json::<Identity>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_deserializes_without_metadata() {
        let raw = r#"{"id":"7e0ab4b8-3ac5-43f2-93e8-bd4a17f7d2a5","email":"a@x.com"}"#;
        let identity: Identity = serde_json::from_str(raw).unwrap();
        assert_eq!(identity.email, "a@x.com");
        assert!(identity.user_metadata.is_null());
    }

    #[test]
    fn identity_keeps_full_name_metadata() {
        let raw = r#"{
            "id":"7e0ab4b8-3ac5-43f2-93e8-bd4a17f7d2a5",
            "email":"a@x.com",
            "user_metadata":{"full_name":"Ana Gómez"}
        }"#;
        let identity: Identity = serde_json::from_str(raw).unwrap();
        assert_eq!(identity.user_metadata["full_name"], "Ana Gómez");
    }

    #[test]
    fn rejected_error_displays_upstream_message() {
        let err = IdentityError::Rejected {
            status: 422,
            message: "A user with this email address has already been registered".into(),
        };
        assert!(err.to_string().contains("already been registered"));
    }
}
