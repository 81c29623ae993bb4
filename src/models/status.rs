use std::fmt;

use serde::{Deserialize, Serialize};

/// Candidate pipeline state. Any state may follow any other through an HR
/// edit; screening, interview and offer actions set their own state.
/// Labels outside the pipeline are kept verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CandidateStatus {
    #[default]
    Screening,
    Shortlist,
    Interview,
    SecondInterview,
    OfferIssued,
    OfferAccepted,
    Rejected,
    OnHold,
    BackUp,
    Other,
    Custom(String),
}

impl CandidateStatus {
    /// Pipeline order, used for dashboards and pickers.
    pub const ALL: [CandidateStatus; 10] = [
        CandidateStatus::Screening,
        CandidateStatus::Shortlist,
        CandidateStatus::Interview,
        CandidateStatus::SecondInterview,
        CandidateStatus::OfferIssued,
        CandidateStatus::OfferAccepted,
        CandidateStatus::Rejected,
        CandidateStatus::OnHold,
        CandidateStatus::BackUp,
        CandidateStatus::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CandidateStatus::Screening => "Screening",
            CandidateStatus::Shortlist => "Shortlist",
            CandidateStatus::Interview => "Interview",
            CandidateStatus::SecondInterview => "Second Interview",
            CandidateStatus::OfferIssued => "Offer Issued",
            CandidateStatus::OfferAccepted => "Offer Accepted",
            CandidateStatus::Rejected => "Rejected",
            CandidateStatus::OnHold => "On Hold",
            CandidateStatus::BackUp => "Back Up",
            CandidateStatus::Other => "Other",
            CandidateStatus::Custom(s) => s,
        }
    }

    pub fn parse_known(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value))
    }
}

impl From<String> for CandidateStatus {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return CandidateStatus::Other;
        }
        Self::parse_known(trimmed).unwrap_or_else(|| CandidateStatus::Custom(trimmed.to_string()))
    }
}

impl From<CandidateStatus> for String {
    fn from(value: CandidateStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-round interview state. Labels written by older tools are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterviewStatus {
    #[default]
    FirstInterview,
    FirstInterviewCompleted,
    SecondInterview,
    SecondInterviewCompleted,
    Other(String),
}

impl InterviewStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InterviewStatus::FirstInterview => "First Interview",
            InterviewStatus::FirstInterviewCompleted => "First Interview Completed",
            InterviewStatus::SecondInterview => "Second Interview",
            InterviewStatus::SecondInterviewCompleted => "Second Interview Completed",
            InterviewStatus::Other(s) => s,
        }
    }

    /// `None` when the row is not in a state that can be completed.
    pub fn completed(&self) -> Option<Self> {
        match self {
            InterviewStatus::FirstInterview => Some(InterviewStatus::FirstInterviewCompleted),
            InterviewStatus::SecondInterview => Some(InterviewStatus::SecondInterviewCompleted),
            _ => None,
        }
    }

    /// `None` when the row has nothing to undo.
    pub fn reopened(&self) -> Option<Self> {
        match self {
            InterviewStatus::FirstInterviewCompleted => Some(InterviewStatus::FirstInterview),
            InterviewStatus::SecondInterviewCompleted => Some(InterviewStatus::SecondInterview),
            _ => None,
        }
    }

    pub fn is_second_round(&self) -> bool {
        matches!(
            self,
            InterviewStatus::SecondInterview | InterviewStatus::SecondInterviewCompleted
        )
    }
}

impl From<String> for InterviewStatus {
    fn from(value: String) -> Self {
        match value.trim() {
            "First Interview" | "" => InterviewStatus::FirstInterview,
            "First Interview Completed" => InterviewStatus::FirstInterviewCompleted,
            "Second Interview" => InterviewStatus::SecondInterview,
            "Second Interview Completed" => InterviewStatus::SecondInterviewCompleted,
            other => InterviewStatus::Other(other.to_string()),
        }
    }
}

impl From<InterviewStatus> for String {
    fn from(value: InterviewStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewMode {
    Online,
    Onsite,
}

impl InterviewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewMode::Online => "Online",
            InterviewMode::Onsite => "Onsite",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "online" => Some(InterviewMode::Online),
            "onsite" | "on-site" => Some(InterviewMode::Onsite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationType {
    #[default]
    HeadOffice,
    Site,
}

impl LocationType {
    /// Only the exact label `Site` selects the site variant.
    pub fn parse(value: &str) -> Self {
        if value.trim() == "Site" {
            LocationType::Site
        } else {
            LocationType::HeadOffice
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::HeadOffice => "Head Office",
            LocationType::Site => "Site",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_status_labels_round_trip() {
        for status in CandidateStatus::ALL {
            assert_eq!(CandidateStatus::from(status.as_str().to_string()), status);
        }
        assert_eq!(CandidateStatus::parse_known("offer issued"), Some(CandidateStatus::OfferIssued));
        assert_eq!(CandidateStatus::parse_known("Hired"), None);
        assert_eq!(CandidateStatus::from("  ".to_string()), CandidateStatus::Other);
    }

    #[test]
    fn unlisted_candidate_status_keeps_its_label() {
        let status = CandidateStatus::from(" Hired ".to_string());
        assert_eq!(status, CandidateStatus::Custom("Hired".into()));
        assert_eq!(status.as_str(), "Hired");
        assert_eq!(String::from(status), "Hired");
        assert_eq!(CandidateStatus::parse_known("Hired"), None);
    }

    #[test]
    fn interview_transitions() {
        let first = InterviewStatus::FirstInterview;
        let done = first.completed().unwrap();
        assert_eq!(done, InterviewStatus::FirstInterviewCompleted);
        assert_eq!(done.reopened(), Some(first.clone()));
        assert!(done.completed().is_none());
        assert!(first.reopened().is_none());
        assert_eq!(
            InterviewStatus::SecondInterview.completed(),
            Some(InterviewStatus::SecondInterviewCompleted)
        );
        assert!(InterviewStatus::Other("Cancelled".into()).completed().is_none());
    }

    #[test]
    fn modes_and_locations() {
        assert_eq!(InterviewMode::parse(" onsite "), Some(InterviewMode::Onsite));
        assert_eq!(InterviewMode::parse("phone"), None);
        assert_eq!(LocationType::parse("Site"), LocationType::Site);
        assert_eq!(LocationType::parse("site"), LocationType::HeadOffice);
        assert_eq!(LocationType::parse(""), LocationType::HeadOffice);
    }
}
