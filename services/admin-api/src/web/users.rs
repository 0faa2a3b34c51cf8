//! services/admin-api/src/web/users.rs
//!
//! Axum handlers for the user CRUD endpoints under `/admin/users`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use connectia_core::domain::{NewUser, Page, User, UserUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Pagination window for list endpoints. Negative values are coerced to
/// zero; omitted values fall back to the defaults (limit 100, offset 0).
#[derive(Deserialize, IntoParams)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn to_page(&self) -> Page {
        Page::new(
            self.limit.unwrap_or(Page::DEFAULT_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub nm_usuario: String,
    pub ds_email: String,
    pub ds_senha: String,
    pub id_carreira: i64,
    pub tp_plano: String,
    pub t_con_carreira_id_area: i64,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        NewUser {
            nm_usuario: req.nm_usuario,
            ds_email: req.ds_email,
            ds_senha: req.ds_senha,
            id_carreira: req.id_carreira,
            tp_plano: req.tp_plano,
            t_con_carreira_id_area: req.t_con_carreira_id_area,
        }
    }
}

/// Partial update; only the fields present here can be changed.
#[derive(Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub nm_usuario: Option<String>,
    pub ds_email: Option<String>,
    pub ds_senha: Option<String>,
    pub id_carreira: Option<i64>,
    pub tp_plano: Option<String>,
    pub t_con_carreira_id_area: Option<i64>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        UserUpdate {
            nm_usuario: req.nm_usuario,
            ds_email: req.ds_email,
            ds_senha: req.ds_senha,
            id_carreira: req.id_carreira,
            tp_plano: req.tp_plano,
            t_con_carreira_id_area: req.t_con_carreira_id_area,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// List users ordered by id.
#[utoipa::path(
    get,
    path = "/admin/users",
    params(Pagination),
    responses(
        (status = 200, description = "Array of users"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.db.list_users(pagination.to_page()).await?;
    Ok(Json(users))
}

/// Fetch a single user by id.
#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = state.db.get_user(id).await?;
    Ok(Json(user))
}

/// Create a user. The new id is assigned by the data-access layer.
#[utoipa::path(
    post,
    path = "/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Missing field or duplicate email"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.db.create_user(req.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Apply a partial update and return the refreshed record.
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user"),
        (status = 400, description = "No updatable field supplied"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let updated = state.db.update_user(id, req.into()).await?;
    Ok(Json(updated))
}

/// Delete a user. Rows still referencing the user block the delete and are
/// reported as a client error.
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Delete blocked by referencing rows"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.db.delete_user(id).await?;
    Ok(Json(MessageResponse {
        message: format!("User {} deleted", id),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let page = Pagination {
            limit: None,
            offset: None,
        }
        .to_page();
        assert_eq!(page.limit, Page::DEFAULT_LIMIT);
        assert_eq!(page.offset, 0);

        let page = Pagination {
            limit: Some(-3),
            offset: Some(2),
        }
        .to_page();
        assert_eq!(page.limit, 0);
        assert_eq!(page.offset, 2);
    }
}
