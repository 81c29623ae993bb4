use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::status::CandidateStatus;
use crate::database::SheetRecord;

pub const CANDIDATES_SHEET: &str = "Candidates";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    #[serde(rename = "Candidate ID")]
    pub candidate_id: String,
    #[serde(rename = "Candidate Name")]
    pub candidate_name: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Nationality")]
    pub nationality: String,
    #[serde(rename = "Status")]
    pub status: CandidateStatus,
    #[serde(rename = "Requestor Assessment")]
    pub requestor_assessment: String,
    #[serde(rename = "HR Owner")]
    pub hr_owner: String,
    #[serde(rename = "Next Action")]
    pub next_action: String,
    #[serde(rename = "CV File Path")]
    pub cv_file_path: String,
    #[serde(rename = "Last Updated")]
    pub last_updated: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Requestor Username")]
    pub requestor_username: String,
    #[serde(rename = "Requestor Comments")]
    pub requestor_comments: String,
    #[serde(rename = "Requestor Action")]
    pub requestor_action: String,
    #[serde(rename = "Suggested Interview Date")]
    pub suggested_interview_date: String,
    #[serde(rename = "Suggested Interview Time")]
    pub suggested_interview_time: String,
    #[serde(rename = "Gov ID / Iqama / Passport #")]
    pub gov_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SheetRecord for Candidate {
    const SHEET: &'static str = CANDIDATES_SHEET;
    const COLUMNS: &'static [&'static str] = &[
        "Candidate ID",
        "Candidate Name",
        "Role",
        "Nationality",
        "Status",
        "Requestor Assessment",
        "HR Owner",
        "Next Action",
        "CV File Path",
        "Last Updated",
        "Notes",
        "Requestor Username",
        "Requestor Comments",
        "Requestor Action",
        "Suggested Interview Date",
        "Suggested Interview Time",
        "Gov ID / Iqama / Passport #",
    ];
}

impl Candidate {
    pub fn is_assigned_to(&self, username: &str) -> bool {
        !username.is_empty() && self.requestor_username.trim() == username
    }
}
