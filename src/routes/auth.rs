use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dto::user_dto::{LoginPayload, LoginResponse, UserResponse},
    error::Result,
    middleware::auth::Principal,
    utils::token::issue_token,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .user_service
        .authenticate(&payload.username, &payload.password)
        .await?;
    let token = issue_token(
        &state.config.jwt_secret,
        &user.username,
        user.role.as_str(),
        state.config.token_ttl_hours,
    )?;
    tracing::info!(username = %user.username, role = %user.role, "Signed in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The signed-in user", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn me(State(state): State<AppState>, principal: Principal) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .get(&principal.username)
        .await?
        .ok_or_else(|| crate::error::Error::Unauthorized("unknown_user".into()))?;
    Ok(Json(UserResponse::from(user)))
}
