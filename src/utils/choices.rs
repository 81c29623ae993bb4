//! Enumerated form fields and their normalisation tables.
//!
//! Normalisation never fails: a value that matches neither a canonical label
//! nor an alias is kept as trimmed free text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceField {
    YesNo,
    MaritalStatus,
    IqamaStatus,
    NoticePeriod,
    Education,
    RequestorAction,
}

pub const YES_NO: &[&str] = &["Yes", "No", "Other"];
pub const MARITAL: &[&str] = &["Single", "Married", "Divorced", "Widowed", "Other"];
pub const IQAMA: &[&str] = &[
    "Valid",
    "Transferable",
    "Expired",
    "N/A (Saudi National)",
    "N/A",
    "Other",
];
pub const NOTICE: &[&str] = &[
    "Immediate",
    "1 week",
    "2 weeks",
    "1 month",
    "2 months",
    "3 months",
    "Other",
];
pub const EDUCATION: &[&str] = &[
    "High School",
    "Diploma",
    "Bachelor's Degree",
    "Master's Degree",
    "PhD",
    "Other",
];
pub const REQUESTOR_ACTIONS: &[&str] = &[
    "None",
    "Schedule Interview",
    "Proceed to Offer",
    "Hold",
    "Reject",
    "Other",
];

pub const NATIONALITIES: &[&str] = &[
    "Saudi",
    "Chinese",
    "Ghanaian",
    "Lebanese",
    "Ugandan",
    "Sudanese",
    "Yemeni",
    "Egyptian",
    "Syrian",
    "Tunisian",
    "Palestinian",
    "Turkish",
    "Jordanian",
    "Indian",
    "Bangladeshi",
    "Nepalese",
    "Pakistani",
    "Greek",
    "Italian",
    "Spanish",
    "Filipino",
    "Other",
];

const YES_NO_ALIASES: &[(&str, &str)] = &[
    ("y", "Yes"),
    ("true", "Yes"),
    ("1", "Yes"),
    ("n", "No"),
    ("false", "No"),
    ("0", "No"),
    ("", "No"),
    ("none", "No"),
];

const NOTICE_ALIASES: &[(&str, &str)] = &[
    ("1w", "1 week"),
    ("2w", "2 weeks"),
    ("1m", "1 month"),
    ("2m", "2 months"),
    ("3m", "3 months"),
];

impl ChoiceField {
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            ChoiceField::YesNo => YES_NO,
            ChoiceField::MaritalStatus => MARITAL,
            ChoiceField::IqamaStatus => IQAMA,
            ChoiceField::NoticePeriod => NOTICE,
            ChoiceField::Education => EDUCATION,
            ChoiceField::RequestorAction => REQUESTOR_ACTIONS,
        }
    }

    fn aliases(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ChoiceField::YesNo => YES_NO_ALIASES,
            ChoiceField::NoticePeriod => NOTICE_ALIASES,
            _ => &[],
        }
    }

    pub fn normalize(self, raw: &str) -> String {
        let value = raw.trim();
        let lower = value.to_lowercase();
        if let Some(label) = self.labels().iter().find(|l| l.to_lowercase() == lower) {
            return (*label).to_string();
        }
        if let Some((_, label)) = self.aliases().iter().find(|(alias, _)| *alias == lower) {
            return (*label).to_string();
        }
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_labels_match_case_insensitively() {
        assert_eq!(ChoiceField::Education.normalize(" bachelor's degree "), "Bachelor's Degree");
        assert_eq!(ChoiceField::IqamaStatus.normalize("n/a"), "N/A");
        assert_eq!(ChoiceField::MaritalStatus.normalize("MARRIED"), "Married");
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(ChoiceField::YesNo.normalize("y"), "Yes");
        assert_eq!(ChoiceField::YesNo.normalize(""), "No");
        assert_eq!(ChoiceField::YesNo.normalize("None"), "No");
        assert_eq!(ChoiceField::NoticePeriod.normalize("2W"), "2 weeks");
    }

    #[test]
    fn unknown_values_pass_through_trimmed() {
        assert_eq!(ChoiceField::NoticePeriod.normalize(" 45 days "), "45 days");
        assert_eq!(ChoiceField::MaritalStatus.normalize(""), "");
        assert_eq!(ChoiceField::Education.normalize("Bootcamp"), "Bootcamp");
    }

    #[test]
    fn normalisation_is_idempotent() {
        for field in [
            ChoiceField::YesNo,
            ChoiceField::MaritalStatus,
            ChoiceField::IqamaStatus,
            ChoiceField::NoticePeriod,
            ChoiceField::Education,
            ChoiceField::RequestorAction,
        ] {
            for input in ["yes", "1m", "phd", "odd value", ""] {
                let once = field.normalize(input);
                assert_eq!(field.normalize(&once), once);
            }
        }
    }
}
