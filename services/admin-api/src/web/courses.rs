//! services/admin-api/src/web/courses.rs
//!
//! Axum handlers for the course endpoints under `/admin/courses`. Courses
//! are read-only here except for status transitions.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use connectia_core::domain::{Course, CourseScope, CourseStatus};
use connectia_core::ports::PortError;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::users::Pagination;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct UpdateCourseStatusRequest {
    /// One of `C`, `N`, `E`.
    pub sts_curso: String,
}

/// Optional composite narrowing of the course identity. The scope applies
/// only when both halves are supplied, mirroring the composite key.
#[derive(Deserialize, IntoParams)]
pub struct ScopeParams {
    pub id_carreira: Option<i64>,
    pub id_area: Option<i64>,
}

impl ScopeParams {
    pub fn to_scope(&self) -> Option<CourseScope> {
        match (self.id_carreira, self.id_area) {
            (Some(id_carreira), Some(id_area)) => Some(CourseScope {
                id_carreira,
                id_area,
            }),
            _ => None,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// List courses ordered by id.
#[utoipa::path(
    get,
    path = "/admin/courses",
    params(Pagination),
    responses(
        (status = 200, description = "Array of courses"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_courses_handler(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = state.db.list_courses(pagination.to_page()).await?;
    Ok(Json(courses))
}

/// Transition a course's status. The status letter is validated before any
/// database access; career/area narrow the update when both are given.
#[utoipa::path(
    put,
    path = "/admin/courses/{id}/status",
    params(
        ("id" = i64, Path, description = "Course id"),
        ScopeParams
    ),
    request_body = UpdateCourseStatusRequest,
    responses(
        (status = 200, description = "Updated course"),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_course_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(scope): Query<ScopeParams>,
    Json(req): Json<UpdateCourseStatusRequest>,
) -> Result<Json<Course>, ApiError> {
    let status = CourseStatus::from_str(&req.sts_curso)
        .map_err(|e| ApiError::Port(PortError::Validation(e)))?;
    let course = state
        .db
        .update_course_status(id, status, scope.to_scope())
        .await?;
    Ok(Json(course))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_requires_both_halves() {
        let scope = ScopeParams {
            id_carreira: Some(2),
            id_area: None,
        };
        assert!(scope.to_scope().is_none());

        let scope = ScopeParams {
            id_carreira: Some(2),
            id_area: Some(7),
        };
        let scope = scope.to_scope().unwrap();
        assert_eq!(scope.id_carreira, 2);
        assert_eq!(scope.id_area, 7);
    }
}
