use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::status::InterviewStatus;
use crate::database::SheetRecord;

pub const INTERVIEWS_SHEET: &str = "Interviews";

/// One interview round. Rows are addressed by `(Candidate ID, Round)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interview {
    #[serde(rename = "Candidate ID")]
    pub candidate_id: String,
    #[serde(rename = "Round", deserialize_with = "round_from_cell")]
    pub round: u32,
    #[serde(rename = "Candidate Name")]
    pub candidate_name: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Interview Date")]
    pub interview_date: String,
    #[serde(rename = "Interview Time")]
    pub interview_time: String,
    #[serde(rename = "Mode")]
    pub mode: String,
    #[serde(rename = "Location/Link")]
    pub location: String,
    #[serde(rename = "Meeting Link")]
    pub meeting_link: String,
    #[serde(rename = "Interviewer")]
    pub interviewer: String,
    #[serde(rename = "ICS Path")]
    pub ics_path: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Created By")]
    pub created_by: String,
    #[serde(rename = "Status")]
    pub status: InterviewStatus,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SheetRecord for Interview {
    const SHEET: &'static str = INTERVIEWS_SHEET;
    const COLUMNS: &'static [&'static str] = &[
        "Candidate ID",
        "Round",
        "Candidate Name",
        "Position",
        "Interview Date",
        "Interview Time",
        "Mode",
        "Location/Link",
        "Meeting Link",
        "Interviewer",
        "ICS Path",
        "Timestamp",
        "Email",
        "Created By",
        "Status",
    ];
}

/// Cells come back as text; older sheets may hold `2.0` or nothing at all.
fn round_from_cell<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Number(f64),
        Text(String),
    }

    Ok(match Cell::deserialize(deserializer)? {
        Cell::Number(n) if n >= 0.0 => n as u32,
        Cell::Number(_) => 0,
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| *n >= 0.0)
            .map(|n| n as u32)
            .unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::table::{record_to_row, row_to_record, Row};

    #[test]
    fn round_reads_text_cells() {
        for (cell, expected) in [("2", 2), ("2.0", 2), ("", 0), ("x", 0)] {
            let mut row = Row::new();
            row.insert("Candidate ID".into(), "C1".into());
            row.insert("Round".into(), cell.into());
            let interview: Interview = row_to_record(&row).unwrap();
            assert_eq!(interview.round, expected, "cell {:?}", cell);
        }
    }

    #[test]
    fn row_round_trip_keeps_status_label() {
        let interview = Interview {
            candidate_id: "C1".into(),
            round: 2,
            status: InterviewStatus::SecondInterviewCompleted,
            ..Default::default()
        };
        let row = record_to_row(&interview).unwrap();
        assert_eq!(row["Round"], "2");
        assert_eq!(row["Status"], "Second Interview Completed");
        assert_eq!(row_to_record::<Interview>(&row).unwrap(), interview);
    }
}
