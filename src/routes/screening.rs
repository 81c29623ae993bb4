use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    dto::screening_dto::{ChoiceLists, PickerItem, ScreeningForm, ScreeningSaved},
    error::{Error, Result},
    middleware::auth::Principal,
    models::screening::Screening,
    utils::files::FormData,
    AppState,
};

pub const TEMPLATE_FILENAME: &str = "screening_import_template.csv";

#[utoipa::path(
    get,
    path = "/api/screening",
    responses((status = 200, description = "Screenings the caller may open", body = [PickerItem]))
)]
#[axum::debug_handler]
pub async fn list_screenings(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    Ok(Json(state.screening_service.picker(&principal).await))
}

#[utoipa::path(
    get,
    path = "/api/screening/choices",
    responses((status = 200, description = "Labels offered by the screening form", body = ChoiceLists))
)]
#[axum::debug_handler]
pub async fn choices(State(_state): State<AppState>, _principal: Principal) -> Json<ChoiceLists> {
    Json(ChoiceLists::current())
}

#[utoipa::path(
    get,
    path = "/api/screening/{id}",
    params(("id" = String, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Screening record", body = Screening),
        (status = 403, description = "Not assigned to this requestor"),
        (status = 404, description = "No screening for this id")
    )
)]
#[axum::debug_handler]
pub async fn get_screening(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let screening = state.screening_service.load(&principal, &id).await?;
    Ok(Json(screening))
}

/// Multipart screening form: one text part per column, plus `cv_file`,
/// `cv_existing`, `nationality_select` and `nationality_other`.
#[utoipa::path(
    post,
    path = "/api/screening",
    responses(
        (status = 200, description = "Screening saved", body = ScreeningSaved),
        (status = 400, description = "Missing name or role, or rejected upload")
    )
)]
#[axum::debug_handler]
pub async fn save_screening(
    State(state): State<AppState>,
    principal: Principal,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = ScreeningForm::from_form(FormData::collect(multipart).await?);
    let saved = state.screening_service.save(&principal, form).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    get,
    path = "/api/screening/template",
    responses((status = 200, description = "CSV import template"))
)]
#[axum::debug_handler]
pub async fn import_template(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse> {
    principal.require_staff()?;
    let body = state.screening_service.template()?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TEMPLATE_FILENAME),
            ),
        ],
        body,
    ))
}

#[utoipa::path(
    post,
    path = "/api/screening/import",
    responses(
        (status = 200, description = "First row imported as a new candidate", body = ScreeningSaved),
        (status = 400, description = "Unsupported file, no data or missing required column")
    )
)]
#[axum::debug_handler]
pub async fn import_screening(
    State(state): State<AppState>,
    principal: Principal,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut form = FormData::collect(multipart).await?;
    let file = form
        .files
        .remove("import_file")
        .ok_or_else(|| Error::BadRequest("No file uploaded".into()))?;
    let saved = state
        .screening_service
        .import(&principal, &file.filename, &file.data)
        .await?;
    Ok(Json(saved))
}

#[utoipa::path(
    delete,
    path = "/api/screening/{id}",
    params(("id" = String, Path, description = "Candidate ID")),
    responses(
        (status = 204, description = "Screening, candidate row and folders removed"),
        (status = 404, description = "Nothing stored for this id")
    )
)]
#[axum::debug_handler]
pub async fn delete_screening(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.screening_service.delete(&principal, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
