use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Request-fatal error variants. Non-fatal outcomes (best-effort write
/// warnings) are collected alongside success responses and never pass
/// through this type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    /// The remote auth service refused to create the identity. Status and
    /// message are mirrored to the caller unchanged.
    #[error("{message}")]
    IdentityCreation { status: u16, message: String },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("missing or invalid bearer token")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::IdentityCreation { .. } => "IDENTITY_CREATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Unexpected(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::IdentityCreation { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Unexpected(ref e) = self {
            tracing::error!(error = %e, "internal error");
        }
        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn validation_returns_400() {
        let resp = ApiError::Validation("email is required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn identity_creation_mirrors_upstream_status() {
        let resp = ApiError::IdentityCreation {
            status: 422,
            message: "email already registered".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn identity_creation_with_bogus_status_falls_back_to_502() {
        let resp = ApiError::IdentityCreation {
            status: 0,
            message: "connection reset".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unexpected_returns_500() {
        let resp = ApiError::Unexpected(anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn upstream_message_is_surfaced_in_error_field() {
        let resp = ApiError::IdentityCreation {
            status: 422,
            message: "email already registered".into(),
        }
        .into_response();
        let json = body_json(resp).await;
        assert_eq!(json["error"], "email already registered");
        assert_eq!(json["kind"], "IDENTITY_CREATION");
    }

    #[tokio::test]
    async fn forbidden_json_body() {
        let resp = ApiError::Forbidden.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let json = body_json(resp).await;
        assert_eq!(json["kind"], "FORBIDDEN");
    }
}
