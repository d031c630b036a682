use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::admin::dto::AssignRoleRequest;
use crate::admin::repo::{self, CourseAdminRow, ProfileWithRole};
use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::roles;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/courses", get(list_courses))
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id/role", put(assign_role))
}

async fn require_admin(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
    let role = roles::resolve_role(&state.tables, user_id).await;
    if roles::admin_allowed(role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CourseAdminRow>>, ApiError> {
    require_admin(&state, user_id).await?;
    let courses = repo::all_courses(&state.tables).await.unwrap_or_else(|e| {
        warn!(error = %e, "admin course fetch failed");
        Vec::new()
    });
    Ok(Json(courses))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ProfileWithRole>>, ApiError> {
    require_admin(&state, user_id).await?;
    let users = repo::all_users_with_roles(&state.tables)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "admin user fetch failed");
            Vec::new()
        });
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn assign_role(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(target): Path<Uuid>,
    Json(payload): Json<AssignRoleRequest>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, user_id).await?;
    repo::set_role(&state.tables, target, payload.role)
        .await
        .map_err(ApiError::Unexpected)?;
    info!(admin = %user_id, %target, role = ?payload.role, "role assigned");
    Ok(StatusCode::NO_CONTENT)
}
