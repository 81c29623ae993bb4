use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    dto::candidate_dto::ExportRequest,
    error::Result,
    middleware::auth::Principal,
    services::export_service::XLSX_CONTENT_TYPE,
    utils::time,
    AppState,
};

/// Export the listed candidates, or every visible one, as XLSX.
#[utoipa::path(
    post,
    path = "/api/candidates/export",
    request_body = ExportRequest,
    responses((status = 200, description = "Styled candidates workbook"))
)]
#[axum::debug_handler]
pub async fn export_candidates(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<ExportRequest>,
) -> Result<impl IntoResponse> {
    let buffer = state.export_service.export(&principal, &payload).await?;
    let filename = format!("candidates_{}.xlsx", time::today().format("%Y%m%d"));
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
