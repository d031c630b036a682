use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::roles;
use crate::state::AppState;
use crate::teaching::dto::NewMaterialRequest;
use crate::teaching::repo::{self, CourseTeachingRow, MaterialRow, NewMaterial};

pub fn teaching_routes() -> Router<AppState> {
    Router::new()
        .route("/teaching/courses", get(list_courses))
        .route(
            "/teaching/courses/:id/materials",
            get(list_materials).post(add_material),
        )
}

async fn require_teaching(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
    let role = roles::resolve_role(&state.tables, user_id).await;
    if roles::teaching_allowed(role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CourseTeachingRow>>, ApiError> {
    require_teaching(&state, user_id).await?;
    let courses = repo::all_courses(&state.tables).await.unwrap_or_else(|e| {
        warn!(error = %e, "teaching course fetch failed");
        Vec::new()
    });
    Ok(Json(courses))
}

#[instrument(skip(state))]
pub async fn list_materials(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<MaterialRow>>, ApiError> {
    require_teaching(&state, user_id).await?;
    let materials = repo::materials_for_course(&state.tables, course_id)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, %course_id, "material fetch failed");
            Vec::new()
        });
    Ok(Json(materials))
}

#[instrument(skip(state, payload))]
pub async fn add_material(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<NewMaterialRequest>,
) -> Result<StatusCode, ApiError> {
    require_teaching(&state, user_id).await?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    if payload.file_url.trim().is_empty() {
        return Err(ApiError::Validation("file_url is required".into()));
    }

    let material = NewMaterial {
        course_id,
        title: title.to_string(),
        description: payload.description,
        material_type: payload.material_type,
        file_url: payload.file_url.trim().to_string(),
        is_preview: payload.is_preview,
        created_by: user_id,
    };
    repo::insert_material(&state.tables, &material)
        .await
        .map_err(ApiError::Unexpected)?;
    info!(%course_id, created_by = %user_id, "course material added");
    Ok(StatusCode::CREATED)
}
