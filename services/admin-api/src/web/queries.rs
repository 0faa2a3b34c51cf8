//! services/admin-api/src/web/queries.rs
//!
//! Axum handlers for the fixed reporting queries under `/admin/queries`.
//! Each query supports an export mode: with `export=true` (also `1`, `yes`,
//! `sim`) the result is written to a JSON file and streamed back as a
//! download instead of being returned inline.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use connectia_core::domain::CourseStatus;
use connectia_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::adapters::{ExportedFile, JsonExporter};
use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// Query Parameters
//=========================================================================================

#[derive(Deserialize, IntoParams)]
pub struct UsersByCareerParams {
    pub id_carreira: Option<i64>,
    pub export: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct CoursesByStatusParams {
    /// One of `C`, `N`, `E`.
    pub sts: Option<String>,
    pub export: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct UserCoursesParams {
    pub id_usuario: Option<i64>,
    pub export: Option<String>,
}

fn export_requested(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "sim")
    )
}

fn missing_param(name: &str) -> ApiError {
    ApiError::Port(PortError::Validation(format!(
        "query parameter {} is required",
        name
    )))
}

/// Streams an export file back as an attachment with the same bytes that
/// were written to disk.
fn download_response(file_name: &str, exported: ExportedFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        exported.bytes,
    )
        .into_response()
}

async fn respond<T: Serialize>(
    state: &AppState,
    query: &str,
    filter: &str,
    export: Option<&str>,
    rows: Vec<T>,
) -> Result<Response, ApiError> {
    if export_requested(export) {
        let file_name = JsonExporter::file_name(query, filter);
        let exported = state.exporter.export(&file_name, &rows).await?;
        return Ok(download_response(&file_name, exported));
    }
    Ok(Json(rows).into_response())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Users belonging to a career, ordered by id.
#[utoipa::path(
    get,
    path = "/admin/queries/users_by_career",
    params(UsersByCareerParams),
    responses(
        (status = 200, description = "Array of users, or a JSON file download"),
        (status = 400, description = "Missing id_carreira"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn users_by_career_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UsersByCareerParams>,
) -> Result<Response, ApiError> {
    let id_carreira = params.id_carreira.ok_or_else(|| missing_param("id_carreira"))?;
    let rows = state.db.users_by_career(id_carreira).await?;
    respond(
        &state,
        "users_by_career",
        &id_carreira.to_string(),
        params.export.as_deref(),
        rows,
    )
    .await
}

/// Courses in a given status, ordered by id.
#[utoipa::path(
    get,
    path = "/admin/queries/courses_by_status",
    params(CoursesByStatusParams),
    responses(
        (status = 200, description = "Array of courses, or a JSON file download"),
        (status = 400, description = "Missing or invalid sts"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn courses_by_status_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CoursesByStatusParams>,
) -> Result<Response, ApiError> {
    let raw = params.sts.as_deref().ok_or_else(|| missing_param("sts"))?;
    let status = CourseStatus::from_str(raw)
        .map_err(|e| ApiError::Port(PortError::Validation(e)))?;
    let rows = state.db.courses_by_status(status).await?;
    respond(
        &state,
        "courses_by_status",
        status.as_str(),
        params.export.as_deref(),
        rows,
    )
    .await
}

/// Courses owned by a user, ordered by start date with missing dates last.
#[utoipa::path(
    get,
    path = "/admin/queries/user_courses",
    params(UserCoursesParams),
    responses(
        (status = 200, description = "Array of courses, or a JSON file download"),
        (status = 400, description = "Missing id_usuario"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn user_courses_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserCoursesParams>,
) -> Result<Response, ApiError> {
    let id_usuario = params.id_usuario.ok_or_else(|| missing_param("id_usuario"))?;
    let rows = state.db.courses_by_user(id_usuario).await?;
    respond(
        &state,
        "user_courses",
        &id_usuario.to_string(),
        params.export.as_deref(),
        rows,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_flag_accepts_the_documented_spellings() {
        for raw in ["1", "true", "yes", "sim", "TRUE", "Sim"] {
            assert!(export_requested(Some(raw)), "{} should enable export", raw);
        }
        for raw in ["0", "false", "no", "nope", ""] {
            assert!(!export_requested(Some(raw)), "{} should not enable export", raw);
        }
        assert!(!export_requested(None));
    }
}
