use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    dto::user_dto::{CreateUserPayload, UpdateUserPayload, UserResponse},
    error::Result,
    middleware::auth::Principal,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Admin only")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    principal.require_admin()?;
    let users: Vec<UserResponse> = state
        .user_service
        .list()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/requestors",
    responses((status = 200, description = "Requestor accounts", body = [UserResponse]))
)]
#[axum::debug_handler]
pub async fn list_requestors(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    principal.require_staff()?;
    let users: Vec<UserResponse> = state
        .user_service
        .requestors()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Username exists or is invalid")
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    principal.require_admin()?;
    payload.validate()?;
    let user = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    patch,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse> {
    principal.require_admin()?;
    payload.validate()?;
    let user = state.user_service.update(&username, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete yourself"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    principal.require_admin()?;
    state
        .user_service
        .delete(&username, &principal.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
