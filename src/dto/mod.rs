pub mod candidate_dto;
pub mod interview_dto;
pub mod offer_dto;
pub mod screening_dto;
pub mod shortlist_dto;
pub mod user_dto;
