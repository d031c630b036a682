use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::checkout::dto::CreatedPurchaseResponse;
use crate::checkout::repo::{self, PaymentMethodRow, PaymentStatus};
use crate::checkout::services::{self, ProofFile};
use crate::error::ApiError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/payment-methods", get(list_payment_methods))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", post(submit_purchase))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB proof images
}

#[instrument(skip(state))]
pub async fn list_payment_methods(State(state): State<AppState>) -> Json<Vec<PaymentMethodRow>> {
    let methods = repo::active_payment_methods(&state.tables)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "payment method fetch failed");
            Vec::new()
        });
    Json(methods)
}

/// POST /purchases (multipart)
/// Fields: course_id, payment_method, optional proof file.
#[instrument(skip(state, mp))]
pub async fn submit_purchase(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<CreatedPurchaseResponse>), ApiError> {
    let mut course_id = None;
    let mut payment_method = None;
    let mut proof = None;

    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("course_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("course_id must be text".into()))?;
                let id = text
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|_| ApiError::Validation("course_id must be a uuid".into()))?;
                course_id = Some(id);
            }
            Some("payment_method") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("payment_method must be text".into()))?;
                payment_method = Some(text.trim().to_string());
            }
            Some("proof") => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("unreadable proof file: {e}")))?;
                proof = Some(ProofFile {
                    bytes,
                    content_type,
                });
            }
            _ => {}
        }
    }

    let course_id =
        course_id.ok_or_else(|| ApiError::Validation("course_id is required".into()))?;
    let payment_method = payment_method
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::Validation("payment_method is required".into()))?;

    let created = services::submit_purchase(
        &state.tables,
        state.storage.as_ref(),
        user_id,
        course_id,
        payment_method,
        proof,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedPurchaseResponse {
            id: created.id,
            payment_status: PaymentStatus::Pending,
            proof_url: created.proof_url,
            warnings: created.warnings,
        }),
    ))
}
