use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    dto::shortlist_dto::{ChecklistResponse, ChecklistSubmission},
    error::Result,
    middleware::auth::Principal,
    utils::files::FormData,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates/{id}/shortlist",
    params(("id" = String, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Saved checklist, or the default items", body = ChecklistResponse),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_checklist(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let items = state.shortlist_service.checklist(&principal, &id).await?;
    Ok(Json(ChecklistResponse {
        candidate_id: id,
        items,
    }))
}

/// Multipart checklist: `rows`, then `item_<i>`, `recv_<i>`, `note_<i>` and an
/// optional `map_<i>` file per row (numbered from 1), plus `new_item`.
#[utoipa::path(
    post,
    path = "/api/candidates/{id}/shortlist",
    params(("id" = String, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Checklist replaced", body = ChecklistResponse),
        (status = 400, description = "Checklist empty or upload rejected"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn save_checklist(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let submission = ChecklistSubmission::from_form(FormData::collect(multipart).await?);
    let items = state
        .shortlist_service
        .save(&principal, &id, submission)
        .await?;
    Ok(Json(ChecklistResponse {
        candidate_id: id,
        items,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}/shortlist/{item}",
    params(
        ("id" = String, Path, description = "Candidate ID"),
        ("item" = String, Path, description = "Checklist item")
    ),
    responses(
        (status = 204, description = "Item removed"),
        (status = 404, description = "Item not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_item(
    State(state): State<AppState>,
    principal: Principal,
    Path((id, item)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    state
        .shortlist_service
        .remove_item(&principal, &id, &item)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}/shortlist/{item}/attachment",
    params(
        ("id" = String, Path, description = "Candidate ID"),
        ("item" = String, Path, description = "Checklist item")
    ),
    responses(
        (status = 204, description = "Mapped file cleared"),
        (status = 404, description = "Item not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_attachment(
    State(state): State<AppState>,
    principal: Principal,
    Path((id, item)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    state
        .shortlist_service
        .remove_attachment(&principal, &id, &item)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
