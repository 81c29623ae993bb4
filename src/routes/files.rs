use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    middleware::auth::Principal,
    utils::naming,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub path: String,
}

/// Serves a stored attachment, invite or offer document inline. Requestors
/// only reach files inside folders of candidates assigned to them.
#[utoipa::path(
    get,
    path = "/api/files",
    params(("path" = String, Query, description = "Stored file path")),
    responses(
        (status = 200, description = "File contents"),
        (status = 403, description = "File belongs to another requestor's candidate"),
        (status = 404, description = "File missing or outside the candidate folders")
    )
)]
#[axum::debug_handler]
pub async fn serve_file(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse> {
    let path = state
        .folders
        .resolve(&query.path)
        .ok_or_else(|| Error::NotFound("File not found".into()))?;

    if principal.requestor_scope().is_some() {
        let folder = state.folders.owner_folder(&path).unwrap_or_default();
        let allowed = state
            .candidate_service
            .all()
            .await
            .iter()
            .filter(|c| principal.can_view(c))
            .any(|c| folder.ends_with(&naming::folder_suffix(&c.candidate_id)));
        if !allowed {
            return Err(Error::Forbidden("this file belongs to another candidate".into()));
        }
    }

    let body = tokio::fs::read(&path).await?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    tracing::debug!(path = %path.display(), by = %principal.username, "Serving stored file");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
