use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::catalog::dto::{CatalogQuery, CategoryDetails, CourseDetails};
use crate::catalog::repo::{self, CategoryRow, CourseRow};
use crate::error::ApiError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/:id", get(get_course))
        .route("/categories", get(list_categories))
        .route("/categories/:slug", get(get_category))
}

/// List fetches degrade to an empty payload when the remote read fails;
/// only single-entity lookups surface a not-found state.
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(q): Query<CatalogQuery>,
) -> Json<Vec<CourseRow>> {
    let courses = repo::featured_courses(&state.tables, q.limit)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "course list fetch failed");
            Vec::new()
        });
    Json(courses)
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseDetails>, ApiError> {
    let course = match repo::course_by_id(&state.tables, id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Err(ApiError::NotFound("course")),
        Err(e) => {
            error!(error = %e, %id, "course fetch failed");
            return Err(ApiError::NotFound("course"));
        }
    };
    let lessons = repo::lessons_for_course(&state.tables, id)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, %id, "lesson fetch failed");
            Vec::new()
        });
    Ok(Json(CourseDetails { course, lessons }))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryRow>> {
    let categories = repo::all_categories(&state.tables).await.unwrap_or_else(|e| {
        warn!(error = %e, "category list fetch failed");
        Vec::new()
    });
    Json(categories)
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryDetails>, ApiError> {
    let category = match repo::category_by_slug(&state.tables, &slug).await {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ApiError::NotFound("category")),
        Err(e) => {
            error!(error = %e, %slug, "category fetch failed");
            return Err(ApiError::NotFound("category"));
        }
    };
    let courses = repo::published_courses_in_category(&state.tables, category.id)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, %slug, "category course fetch failed");
            Vec::new()
        });
    Ok(Json(CategoryDetails { category, courses }))
}
