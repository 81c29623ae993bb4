use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::database::SheetRecord;

pub const OFFERS_SHEET: &str = "Offer_Details";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offer {
    #[serde(rename = "Candidate ID")]
    pub candidate_id: String,
    #[serde(rename = "Candidate Name")]
    pub candidate_name: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Offer Issue Date")]
    pub issue_date: String,
    #[serde(rename = "Basic Salary")]
    pub basic_salary: String,
    #[serde(rename = "Accommodation Allowance")]
    pub accommodation_allowance: String,
    #[serde(rename = "Transportation Allowance")]
    pub transportation_allowance: String,
    #[serde(rename = "Monthly Fixed Allowance")]
    pub monthly_fixed_allowance: String,
    #[serde(rename = "Other Monthly Allowance")]
    pub other_monthly_allowance: String,
    #[serde(rename = "Air Ticket")]
    pub air_ticket: String,
    #[serde(rename = "Total Package")]
    pub total_package: String,
    #[serde(rename = "Template")]
    pub template: String,
    #[serde(rename = "Offer Excel Path")]
    pub offer_excel_path: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SheetRecord for Offer {
    const SHEET: &'static str = OFFERS_SHEET;
    const COLUMNS: &'static [&'static str] = &[
        "Candidate ID",
        "Candidate Name",
        "Position",
        "Offer Issue Date",
        "Basic Salary",
        "Accommodation Allowance",
        "Transportation Allowance",
        "Monthly Fixed Allowance",
        "Other Monthly Allowance",
        "Air Ticket",
        "Total Package",
        "Template",
        "Offer Excel Path",
        "Timestamp",
    ];
}
