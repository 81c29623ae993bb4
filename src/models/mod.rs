pub mod candidate;
pub mod interview;
pub mod offer;
pub mod screening;
pub mod shortlist;
pub mod status;
pub mod user;

/// Every sheet holding per-candidate rows, in the order they are cleaned up.
pub const CANDIDATE_SHEETS: &[&str] = &[
    screening::SCREENING_SHEET,
    candidate::CANDIDATES_SHEET,
    interview::INTERVIEWS_SHEET,
    shortlist::SHORTLIST_SHEET,
    offer::OFFERS_SHEET,
];
