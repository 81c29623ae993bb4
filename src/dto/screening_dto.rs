use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::screening::Screening;
use crate::utils::{choices, files::{FormData, UploadedFile}};

/// Text fields of the screening form keyed by column name, plus the
/// `nationality_select`/`nationality_other`/`cv_existing` helpers.
#[derive(Debug, Clone, Default)]
pub struct ScreeningForm {
    pub fields: HashMap<String, String>,
    pub cv_file: Option<UploadedFile>,
}

impl ScreeningForm {
    pub fn from_form(mut form: FormData) -> Self {
        Self {
            cv_file: form.files.remove("cv_file"),
            fields: form.texts,
        }
    }

    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerItem {
    pub candidate_id: String,
    pub candidate_name: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningSaved {
    pub candidate_id: String,
    pub folder: String,
    pub screening: Screening,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceLists {
    pub yes_no: Vec<String>,
    pub marital: Vec<String>,
    pub iqama: Vec<String>,
    pub notice: Vec<String>,
    pub education: Vec<String>,
    pub nationalities: Vec<String>,
    pub requestor_actions: Vec<String>,
}

impl ChoiceLists {
    pub fn current() -> Self {
        let owned = |labels: &[&str]| -> Vec<String> { labels.iter().map(|l| l.to_string()).collect() };
        Self {
            yes_no: owned(choices::YES_NO),
            marital: owned(choices::MARITAL),
            iqama: owned(choices::IQAMA),
            notice: owned(choices::NOTICE),
            education: owned(choices::EDUCATION),
            nationalities: owned(choices::NATIONALITIES),
            requestor_actions: owned(choices::REQUESTOR_ACTIONS),
        }
    }
}
