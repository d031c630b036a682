use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{MeResponse, SignUpRequest, SignUpResponse},
        extractors::AuthUser,
        repo, services,
    },
    error::ApiError,
    roles,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/signup", post(sign_up))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<SignUpResponse>, ApiError> {
    let registration = services::register_user(
        state.identity.as_ref(),
        state.registry.as_ref(),
        &payload.email,
        &payload.password,
        &payload.full_name,
    )
    .await?;

    if registration.warnings.is_empty() {
        info!(user_id = %registration.identity.id, "user registered");
    } else {
        warn!(
            user_id = %registration.identity.id,
            warnings = registration.warnings.len(),
            "user registered with degraded profile data"
        );
    }

    Ok(Json(SignUpResponse {
        success: true,
        user: registration.identity,
        message: "user registered".to_string(),
        warnings: registration.warnings,
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let profile = repo::fetch_profile(&state.tables, user_id)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, %user_id, "profile fetch failed");
            None
        });
    let role = roles::resolve_role(&state.tables, user_id).await;

    Ok(Json(MeResponse {
        id: user_id,
        email: profile.as_ref().and_then(|p| p.email.clone()),
        full_name: profile.and_then(|p| p.full_name),
        role,
    }))
}
