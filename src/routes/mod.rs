pub mod auth;
pub mod candidate_routes;
pub mod export;
pub mod files;
pub mod health;
pub mod interviews;
pub mod offers;
pub mod openapi;
pub mod screening;
pub mod shortlist;
pub mod users;
