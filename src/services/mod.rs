pub mod calendar_service;
pub mod candidate_service;
pub mod export_service;
pub mod folder_service;
pub mod import_service;
pub mod interview_service;
pub mod offer_service;
pub mod screening_service;
pub mod shortlist_service;
pub mod user_service;
