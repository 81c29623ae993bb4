use serde::{Deserialize, Serialize};

use crate::models::shortlist::ShortlistItem;
use crate::utils::files::{FormData, UploadedFile};

/// One submitted checklist row (`item_<i>`, `recv_<i>`, `note_<i>`, `map_<i>`),
/// numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct ChecklistRowInput {
    pub item: String,
    pub received: String,
    pub notes: String,
    pub upload: Option<UploadedFile>,
}

#[derive(Debug, Clone, Default)]
pub struct ChecklistSubmission {
    pub rows: Vec<ChecklistRowInput>,
    pub new_item: String,
}

impl ChecklistSubmission {
    /// Reads rows `1..=rows`; a missing or unparsable count means none.
    pub fn from_form(mut form: FormData) -> Self {
        let count: usize = form.text("rows").parse().unwrap_or(0);
        let rows = (1..=count)
            .map(|i| ChecklistRowInput {
                item: form.text(&format!("item_{}", i)).to_string(),
                received: form.text(&format!("recv_{}", i)).to_string(),
                notes: form.text(&format!("note_{}", i)).to_string(),
                upload: form.files.remove(&format!("map_{}", i)),
            })
            .collect();
        Self {
            rows,
            new_item: form.text("new_item").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistResponse {
    pub candidate_id: String,
    pub items: Vec<ShortlistItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> FormData {
        FormData {
            texts: fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let submission = ChecklistSubmission::from_form(form(&[
            ("rows", "2"),
            ("item_1", "CV/Resume"),
            ("recv_1", "yes"),
            ("item_2", "Passport"),
            ("note_2", "expired"),
            ("new_item", "Medical Report"),
        ]));
        let items: Vec<&str> = submission.rows.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, ["CV/Resume", "Passport"]);
        assert_eq!(submission.rows[0].received, "yes");
        assert_eq!(submission.rows[1].notes, "expired");
        assert_eq!(submission.new_item, "Medical Report");
    }

    #[test]
    fn bad_row_count_reads_nothing() {
        let submission = ChecklistSubmission::from_form(form(&[("rows", "two"), ("item_1", "CV/Resume")]));
        assert!(submission.rows.is_empty());
    }
}
