use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::interview::Interview;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SchedulePayload {
    #[validate(length(min = 1))]
    pub candidate_id: String,
    /// Falls back to the candidate's role.
    #[serde(default)]
    pub position: String,
    #[validate(length(min = 1, message = "Pick date and time"))]
    pub interview_date: String,
    #[validate(length(min = 1, message = "Pick date and time"))]
    pub interview_time: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub meeting_link: String,
    #[serde(default)]
    pub interviewer: String,
    #[serde(default)]
    pub is_second: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewView {
    #[serde(flatten)]
    pub interview: Interview,
    pub is_past: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub interview: Interview,
    /// `false` when an existing first-round row was updated.
    pub created: bool,
    pub ics_path: String,
    pub mailto: Option<String>,
    pub body: String,
}
