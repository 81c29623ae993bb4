use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    dto::candidate_dto::{
        CandidateDetail, CandidateListQuery, CommentPayload, DashboardResponse, UpdateMetaPayload,
    },
    error::Result,
    middleware::auth::Principal,
    models::candidate::Candidate,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates",
    params(
        ("name" = Option<String>, Query, description = "Name contains"),
        ("role" = Option<String>, Query, description = "Role contains"),
        ("status" = Option<String>, Query, description = "Exact status, or All"),
        ("search_id" = Option<String>, Query, description = "Candidate ID or Gov ID contains")
    ),
    responses((status = 200, description = "Matching candidates", body = [Candidate]))
)]
#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.list(&principal, &query).await;
    Ok(Json(candidates))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(("id" = String, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Candidate with CV, checklist and latest offer", body = CandidateDetail),
        (status = 403, description = "Not assigned to this requestor"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let detail = state.candidate_service.detail(&principal, &id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    patch,
    path = "/api/candidates/{id}/meta",
    params(("id" = String, Path, description = "Candidate ID")),
    request_body = UpdateMetaPayload,
    responses(
        (status = 200, description = "Candidate updated", body = Candidate),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate_meta(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMetaPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state
        .candidate_service
        .update_meta(&principal, &id, payload)
        .await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    post,
    path = "/api/candidates/{id}/comment",
    params(("id" = String, Path, description = "Candidate ID")),
    request_body = CommentPayload,
    responses(
        (status = 200, description = "Requestor feedback saved", body = Candidate),
        (status = 403, description = "Not assigned to this requestor"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn comment_candidate(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state
        .candidate_service
        .comment(&principal, &id, payload)
        .await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}",
    params(("id" = String, Path, description = "Candidate ID")),
    responses(
        (status = 204, description = "Candidate removed from every sheet and folder"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.candidate_service.delete(&principal, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, description = "Pipeline totals and recent activity", body = DashboardResponse))
)]
#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    Ok(Json(state.candidate_service.dashboard(&principal).await))
}
