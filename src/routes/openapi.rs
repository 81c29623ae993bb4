use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use super::{
    auth, candidate_routes, export, files, health, interviews, offers, screening, shortlist, users,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Recruitment Tracker API"),
    paths(
        health::health,
        auth::login,
        auth::me,
        users::list_users,
        users::list_requestors,
        users::create_user,
        users::update_user,
        users::delete_user,
        screening::list_screenings,
        screening::choices,
        screening::get_screening,
        screening::save_screening,
        screening::import_template,
        screening::import_screening,
        screening::delete_screening,
        interviews::list_interviews,
        interviews::schedule_interview,
        interviews::complete_interview,
        interviews::undo_interview,
        interviews::delete_interview,
        interviews::download_invite,
        offers::offer_draft,
        offers::generate_offer,
        offers::download_offer,
        candidate_routes::list_candidates,
        candidate_routes::get_candidate,
        candidate_routes::update_candidate_meta,
        candidate_routes::comment_candidate,
        candidate_routes::delete_candidate,
        candidate_routes::dashboard,
        export::export_candidates,
        shortlist::get_checklist,
        shortlist::save_checklist,
        shortlist::delete_item,
        shortlist::delete_attachment,
        files::serve_file,
    )
)]
pub struct ApiDoc;

#[axum::debug_handler]
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
