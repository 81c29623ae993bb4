use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::database::SheetRecord;

pub const SCREENING_SHEET: &str = "Screening_Form";

/// The intake questionnaire, one row per candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Screening {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Candidate ID")]
    pub candidate_id: String,
    #[serde(rename = "Candidate Name")]
    pub candidate_name: String,
    #[serde(rename = "Role Interviewed For")]
    pub role: String,
    #[serde(rename = "Candidate Email")]
    pub email: String,
    #[serde(rename = "Phone Number")]
    pub phone: String,
    #[serde(rename = "Total Experience")]
    pub total_experience: String,
    #[serde(rename = "Relevant Domain Experience")]
    pub relevant_experience: String,
    #[serde(rename = "Current Organization")]
    pub current_organization: String,
    #[serde(rename = "Current Role/Title")]
    pub current_title: String,
    #[serde(rename = "Previous Organizations/Roles")]
    pub previous_roles: String,
    #[serde(rename = "Screening Notes")]
    pub screening_notes: String,
    #[serde(rename = "Highest Education")]
    pub highest_education: String,
    #[serde(rename = "DOB")]
    pub dob: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Marital Status")]
    pub marital_status: String,
    #[serde(rename = "Family Status (if Married)")]
    pub family_status: String,
    #[serde(rename = "Children – Number & Age")]
    pub children: String,
    #[serde(rename = "Current Location")]
    pub current_location: String,
    #[serde(rename = "Desired Location")]
    pub desired_location: String,
    #[serde(rename = "Nationality")]
    pub nationality: String,
    #[serde(rename = "Iqama Status")]
    pub iqama_status: String,
    #[serde(rename = "Profession in Iqama")]
    pub iqama_profession: String,
    #[serde(rename = "Current Compensation")]
    pub current_compensation: String,
    #[serde(rename = "Expected Compensation")]
    pub expected_compensation: String,
    #[serde(rename = "Notice Period")]
    pub notice_period: String,
    #[serde(rename = "Ever Interviewed by the client before? (Yes/No)")]
    pub interviewed_before: String,
    #[serde(rename = "Recorded By")]
    pub recorded_by: String,
    #[serde(rename = "Gov ID / Iqama / Passport #")]
    pub gov_id: String,
    #[serde(rename = "CV File Path")]
    pub cv_file_path: String,
    #[serde(rename = "Requestor Username")]
    pub requestor_username: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SheetRecord for Screening {
    const SHEET: &'static str = SCREENING_SHEET;
    const COLUMNS: &'static [&'static str] = &[
        "Timestamp",
        "Candidate ID",
        "Candidate Name",
        "Role Interviewed For",
        "Candidate Email",
        "Phone Number",
        "Total Experience",
        "Relevant Domain Experience",
        "Current Organization",
        "Current Role/Title",
        "Previous Organizations/Roles",
        "Screening Notes",
        "Highest Education",
        "DOB",
        "Age",
        "Marital Status",
        "Family Status (if Married)",
        "Children – Number & Age",
        "Current Location",
        "Desired Location",
        "Nationality",
        "Iqama Status",
        "Profession in Iqama",
        "Current Compensation",
        "Expected Compensation",
        "Notice Period",
        "Ever Interviewed by the client before? (Yes/No)",
        "Recorded By",
        "Gov ID / Iqama / Passport #",
        "CV File Path",
        "Requestor Username",
    ];
}
