use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    dto::offer_dto::{OfferGenerated, OfferPayload},
    error::Result,
    middleware::auth::Principal,
    services::export_service::XLSX_CONTENT_TYPE,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/offers/{candidate_id}/draft",
    params(("candidate_id" = String, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Prefilled offer form", body = OfferPayload),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn offer_draft(
    State(state): State<AppState>,
    principal: Principal,
    Path(candidate_id): Path<String>,
) -> Result<impl IntoResponse> {
    let draft = state.offer_service.draft(&principal, &candidate_id).await?;
    Ok(Json(draft))
}

#[utoipa::path(
    post,
    path = "/api/offers",
    request_body = OfferPayload,
    responses(
        (status = 201, description = "Offer document generated", body = OfferGenerated),
        (status = 400, description = "Invalid payload or template missing"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn generate_offer(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<OfferPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let generated = state.offer_service.generate(&principal, payload).await?;
    Ok((StatusCode::CREATED, Json(generated)))
}

#[utoipa::path(
    get,
    path = "/api/offers/{candidate_id}/document",
    params(("candidate_id" = String, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Generated offer workbook"),
        (status = 404, description = "No offer document")
    )
)]
#[axum::debug_handler]
pub async fn download_offer(
    State(state): State<AppState>,
    principal: Principal,
    Path(candidate_id): Path<String>,
) -> Result<impl IntoResponse> {
    let path = state.offer_service.document(&principal, &candidate_id).await?;
    let body = tokio::fs::read(&path).await?;
    let filename = format!("{}-offer.xlsx", candidate_id);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
