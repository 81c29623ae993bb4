use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{candidate::Candidate, offer::Offer, shortlist::ShortlistItem};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateListQuery {
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub search_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMetaPayload {
    #[validate(custom(function = "crate::utils::validation::known_status"))]
    pub status: String,
    #[serde(default)]
    pub next_action: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentPayload {
    #[validate(length(max = 4000))]
    pub requestor_comments: String,
    pub requestor_action: String,
    #[validate(custom(function = "crate::utils::validation::ymd_date"))]
    pub suggested_interview_date: String,
    pub suggested_interview_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDetail {
    pub candidate: Candidate,
    /// Only set when the file exists inside the candidate folders.
    pub cv_path: Option<String>,
    pub checklist: Vec<ShortlistItem>,
    pub offer: Option<Offer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub total: usize,
    pub updated_last_week: usize,
    pub with_cv: usize,
    pub shortlisted: usize,
    pub interview: usize,
    pub offer_issued: usize,
    pub offer_accepted: usize,
    pub on_hold: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub totals: DashboardTotals,
    pub statuses: Vec<StatusCount>,
    pub recent: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRequest {
    pub candidate_ids: Option<Vec<String>>,
}
