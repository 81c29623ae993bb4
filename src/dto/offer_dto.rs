use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::offer::Offer;

/// Offer form. Also returned, prefilled, as the draft for a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OfferPayload {
    #[validate(length(min = 1))]
    pub candidate_id: String,
    pub candidate_name: String,
    pub position: String,
    pub gov_id: String,
    pub nationality: String,
    pub email: String,
    /// `Head Office` or `Site`.
    pub location_type: String,
    #[validate(custom(function = "crate::utils::validation::ymd_date"))]
    pub issue_date: String,
    pub basic_salary: String,
    pub accommodation_allowance: String,
    pub transportation_allowance: String,
    pub monthly_fixed_allowance: String,
    pub other_monthly_allowance: String,
    pub air_ticket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferGenerated {
    pub offer: Offer,
    pub template: String,
    pub total_package: String,
    pub document_path: String,
}
