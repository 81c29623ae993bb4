pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::database::WorkbookStore;
use crate::services::{
    candidate_service::CandidateService, export_service::ExportService,
    folder_service::FolderService, interview_service::InterviewService,
    offer_service::OfferService, screening_service::ScreeningService,
    shortlist_service::ShortlistService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: WorkbookStore,
    pub folders: FolderService,
    pub user_service: UserService,
    pub candidate_service: CandidateService,
    pub screening_service: ScreeningService,
    pub interview_service: InterviewService,
    pub offer_service: OfferService,
    pub shortlist_service: ShortlistService,
    pub export_service: ExportService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = WorkbookStore::new(config.workbook_path.clone());
        let folders = FolderService::new(config.candidates_dir.clone());

        let user_service = UserService::new(config.users_path.clone());
        let candidate_service = CandidateService::new(store.clone(), folders.clone());
        let screening_service = ScreeningService::new(store.clone(), folders.clone());
        let interview_service = InterviewService::new(
            store.clone(),
            folders.clone(),
            candidate_service.clone(),
            config.onsite_location.clone(),
        );
        let offer_service = OfferService::new(
            store.clone(),
            folders.clone(),
            candidate_service.clone(),
            config.templates_dir.clone(),
        );
        let shortlist_service = ShortlistService::new(store.clone(), folders.clone());
        let export_service = ExportService::new(candidate_service.clone());

        Self {
            config: Arc::new(config),
            store,
            folders,
            user_service,
            candidate_service,
            screening_service,
            interview_service,
            offer_service,
            shortlist_service,
            export_service,
        }
    }
}

/// The full HTTP surface. Tracing, CORS and the body limit are applied here so
/// tests exercise the same stack as the binary.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_mb * 1024 * 1024;

    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/openapi.json", get(routes::openapi::openapi_json));

    let auth_api = Router::new()
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route("/api/users/requestors", get(routes::users::list_requestors))
        .route(
            "/api/users/:username",
            patch(routes::users::update_user).delete(routes::users::delete_user),
        );

    let screening_api = Router::new()
        .route(
            "/api/screening",
            get(routes::screening::list_screenings).post(routes::screening::save_screening),
        )
        .route("/api/screening/choices", get(routes::screening::choices))
        .route("/api/screening/template", get(routes::screening::import_template))
        .route("/api/screening/import", post(routes::screening::import_screening))
        .route(
            "/api/screening/:id",
            get(routes::screening::get_screening).delete(routes::screening::delete_screening),
        );

    let interview_api = Router::new()
        .route(
            "/api/interviews",
            get(routes::interviews::list_interviews).post(routes::interviews::schedule_interview),
        )
        .route(
            "/api/interviews/:candidate_id/:round",
            delete(routes::interviews::delete_interview),
        )
        .route(
            "/api/interviews/:candidate_id/:round/complete",
            post(routes::interviews::complete_interview),
        )
        .route(
            "/api/interviews/:candidate_id/:round/undo",
            post(routes::interviews::undo_interview),
        )
        .route(
            "/api/interviews/:candidate_id/:round/invite",
            get(routes::interviews::download_invite),
        );

    let offer_api = Router::new()
        .route("/api/offers", post(routes::offers::generate_offer))
        .route("/api/offers/:candidate_id/draft", get(routes::offers::offer_draft))
        .route(
            "/api/offers/:candidate_id/document",
            get(routes::offers::download_offer),
        );

    let candidate_api = Router::new()
        .route("/api/candidates", get(routes::candidate_routes::list_candidates))
        .route("/api/candidates/export", post(routes::export::export_candidates))
        .route(
            "/api/candidates/:id",
            get(routes::candidate_routes::get_candidate)
                .delete(routes::candidate_routes::delete_candidate),
        )
        .route(
            "/api/candidates/:id/meta",
            patch(routes::candidate_routes::update_candidate_meta),
        )
        .route(
            "/api/candidates/:id/comment",
            post(routes::candidate_routes::comment_candidate),
        )
        .route(
            "/api/candidates/:id/shortlist",
            get(routes::shortlist::get_checklist).post(routes::shortlist::save_checklist),
        )
        .route(
            "/api/candidates/:id/shortlist/:item",
            delete(routes::shortlist::delete_item),
        )
        .route(
            "/api/candidates/:id/shortlist/:item/attachment",
            delete(routes::shortlist::delete_attachment),
        )
        .route("/api/dashboard", get(routes::candidate_routes::dashboard))
        .route("/api/files", get(routes::files::serve_file));

    base_routes
        .merge(auth_api)
        .merge(screening_api)
        .merge(interview_api)
        .merge(offer_api)
        .merge(candidate_api)
        .with_state(state)
        .layer(middleware::cors::api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
