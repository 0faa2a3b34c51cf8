//! services/admin-api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification and the root
//! endpoint index.

use axum::{response::Json, http::StatusCode};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::web::{courses, queries, users};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        users::list_users_handler,
        users::get_user_handler,
        users::create_user_handler,
        users::update_user_handler,
        users::delete_user_handler,
        courses::list_courses_handler,
        courses::update_course_status_handler,
        queries::users_by_career_handler,
        queries::courses_by_status_handler,
        queries::user_courses_handler,
    ),
    components(
        schemas(
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::MessageResponse,
            courses::UpdateCourseStatusRequest,
        )
    ),
    tags(
        (name = "Connectia Admin API", description = "Administrative CRUD and reporting endpoints for the users/courses schema.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Root Endpoint Index
//=========================================================================================

/// Describes the available endpoints so the service is explorable without
/// the Swagger UI.
pub async fn index_handler() -> (StatusCode, Json<Value>) {
    let body = json!({
        "service": "Connectia Admin API",
        "endpoints": {
            "GET /admin/users": "list users (limit, offset)",
            "POST /admin/users": "create user (json)",
            "GET /admin/users/{id}": "fetch user",
            "PUT /admin/users/{id}": "update user",
            "DELETE /admin/users/{id}": "delete user",
            "GET /admin/courses": "list courses (limit, offset)",
            "PUT /admin/courses/{id}/status": "update course status (json sts_curso)",
            "GET /admin/queries/users_by_career": "users of a career (id_carreira, export=true)",
            "GET /admin/queries/courses_by_status": "courses in a status (sts, export=true)",
            "GET /admin/queries/user_courses": "courses of a user (id_usuario, export=true)"
        }
    });
    (StatusCode::OK, Json(body))
}
