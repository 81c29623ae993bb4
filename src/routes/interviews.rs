use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    dto::interview_dto::{InterviewView, SchedulePayload, ScheduleResponse},
    error::Result,
    middleware::auth::Principal,
    models::interview::Interview,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/interviews",
    responses((status = 200, description = "Scheduled rounds", body = [InterviewView]))
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    Ok(Json(state.interview_service.list(&principal).await))
}

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = SchedulePayload,
    responses(
        (status = 201, description = "Round created", body = ScheduleResponse),
        (status = 200, description = "First round rescheduled", body = ScheduleResponse),
        (status = 400, description = "Missing or malformed date and time"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<SchedulePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let scheduled = state.interview_service.schedule(&principal, payload).await?;
    let status = if scheduled.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(scheduled)))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{candidate_id}/{round}/complete",
    params(
        ("candidate_id" = String, Path, description = "Candidate ID"),
        ("round" = u32, Path, description = "Interview round")
    ),
    responses(
        (status = 200, description = "Round after the transition", body = Interview),
        (status = 404, description = "Round not found")
    )
)]
#[axum::debug_handler]
pub async fn complete_interview(
    State(state): State<AppState>,
    principal: Principal,
    Path((candidate_id, round)): Path<(String, u32)>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .complete(&principal, &candidate_id, round)
        .await?;
    Ok(Json(interview))
}

#[utoipa::path(
    post,
    path = "/api/interviews/{candidate_id}/{round}/undo",
    params(
        ("candidate_id" = String, Path, description = "Candidate ID"),
        ("round" = u32, Path, description = "Interview round")
    ),
    responses(
        (status = 200, description = "Round after the transition", body = Interview),
        (status = 404, description = "Round not found")
    )
)]
#[axum::debug_handler]
pub async fn undo_interview(
    State(state): State<AppState>,
    principal: Principal,
    Path((candidate_id, round)): Path<(String, u32)>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .undo(&principal, &candidate_id, round)
        .await?;
    Ok(Json(interview))
}

#[utoipa::path(
    delete,
    path = "/api/interviews/{candidate_id}/{round}",
    params(
        ("candidate_id" = String, Path, description = "Candidate ID"),
        ("round" = u32, Path, description = "Interview round")
    ),
    responses(
        (status = 204, description = "Round deleted"),
        (status = 404, description = "Round not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_interview(
    State(state): State<AppState>,
    principal: Principal,
    Path((candidate_id, round)): Path<(String, u32)>,
) -> Result<impl IntoResponse> {
    state
        .interview_service
        .delete(&principal, &candidate_id, round)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/interviews/{candidate_id}/{round}/invite",
    params(
        ("candidate_id" = String, Path, description = "Candidate ID"),
        ("round" = u32, Path, description = "Interview round")
    ),
    responses(
        (status = 200, description = "Calendar invite"),
        (status = 404, description = "Round or invite file not found")
    )
)]
#[axum::debug_handler]
pub async fn download_invite(
    State(state): State<AppState>,
    principal: Principal,
    Path((candidate_id, round)): Path<(String, u32)>,
) -> Result<impl IntoResponse> {
    let path = state
        .interview_service
        .invite(&principal, &candidate_id, round)
        .await?;
    let body = tokio::fs::read(&path).await?;
    let filename = format!("interview-{}-round-{}.ics", candidate_id, round);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
