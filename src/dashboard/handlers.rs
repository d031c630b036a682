use axum::{extract::State, routing::get, Json, Router};
use tracing::{instrument, warn};

use crate::auth::extractors::AuthUser;
use crate::dashboard::dto::{DashboardResponse, DashboardStats};
use crate::dashboard::repo;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// The three sources load concurrently; each one degrades to an empty
/// section when its fetch fails.
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<DashboardResponse> {
    let (enrollments, purchases, activity) = tokio::join!(
        repo::enrollments_for_user(&state.tables, user_id),
        repo::purchases_for_user(&state.tables, user_id),
        repo::recent_activity(&state.tables, user_id),
    );

    let enrollments = enrollments.unwrap_or_else(|e| {
        warn!(error = %e, %user_id, "enrollment fetch failed");
        Vec::new()
    });
    let purchases = purchases.unwrap_or_else(|e| {
        warn!(error = %e, %user_id, "purchase fetch failed");
        Vec::new()
    });
    let activity = activity.unwrap_or_else(|e| {
        warn!(error = %e, %user_id, "activity fetch failed");
        Vec::new()
    });

    Json(DashboardResponse {
        stats: DashboardStats::derive(&enrollments, &purchases),
        enrollments,
        purchases,
        activity,
    })
}
