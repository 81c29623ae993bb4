use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::database::SheetRecord;

pub const SHORTLIST_SHEET: &str = "Shortlist_Request";

pub const DEFAULT_ITEMS: &[&str] = &[
    "CV/Resume",
    "Passport/Iqama Copy",
    "Education Certificate",
    "Experience Letters",
    "Requestor Assessment (Internal)",
];

/// A required document for a candidate, unique by `(Candidate ID, Item)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortlistItem {
    #[serde(rename = "Candidate ID")]
    pub candidate_id: String,
    #[serde(rename = "Candidate Name")]
    pub candidate_name: String,
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Received (Yes/No)")]
    pub received: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Mapped File Path")]
    pub mapped_file_path: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SheetRecord for ShortlistItem {
    const SHEET: &'static str = SHORTLIST_SHEET;
    const COLUMNS: &'static [&'static str] = &[
        "Candidate ID",
        "Candidate Name",
        "Item",
        "Received (Yes/No)",
        "Notes",
        "Mapped File Path",
        "Timestamp",
    ];
}
