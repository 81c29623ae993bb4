use std::collections::HashMap;

use crate::database::{table::row_to_record, Table, WorkbookStore};
use crate::dto::screening_dto::{PickerItem, ScreeningForm, ScreeningSaved};
use crate::error::{Error, Result};
use crate::middleware::auth::Principal;
use crate::models::{
    candidate::{Candidate, CANDIDATES_SHEET},
    screening::{Screening, SCREENING_SHEET},
    status::CandidateStatus,
};
use crate::services::{folder_service::FolderService, import_service};
use crate::utils::{choices::ChoiceField, naming, time};

pub const NEXT_ACTION_AFTER_SCREENING: &str = "Review screening details";
pub const DEFAULT_ASSESSMENT: &str = "Pending";

#[derive(Clone)]
pub struct ScreeningService {
    store: WorkbookStore,
    folders: FolderService,
}

impl ScreeningService {
    pub fn new(store: WorkbookStore, folders: FolderService) -> Self {
        Self { store, folders }
    }

    /// `Name [ID]` entries for every screening the caller may open.
    pub async fn picker(&self, principal: &Principal) -> Vec<PickerItem> {
        let mut items: Vec<PickerItem> = self
            .store
            .records::<Screening>()
            .await
            .into_iter()
            .filter(|s| !s.candidate_id.trim().is_empty())
            .filter(|s| match principal.requestor_scope() {
                Some(username) => s.requestor_username.trim() == username,
                None => true,
            })
            .map(|s| PickerItem {
                label: format!("{} [{}]", s.candidate_name.trim(), s.candidate_id.trim()),
                candidate_id: s.candidate_id,
                candidate_name: s.candidate_name,
            })
            .collect();
        items.sort_by(|a, b| a.label.cmp(&b.label));
        items
    }

    pub async fn load(&self, principal: &Principal, id: &str) -> Result<Screening> {
        let screening = self
            .store
            .records::<Screening>()
            .await
            .into_iter()
            .find(|s| s.candidate_id == id)
            .ok_or_else(|| Error::NotFound(format!("Screening for {} not found", id)))?;

        if let Some(username) = principal.requestor_scope() {
            if screening.requestor_username.trim() != username {
                tracing::warn!(candidate_id = id, user = %principal.username, "Screening access denied");
                return Err(Error::Forbidden("this candidate's screening".into()));
            }
        }
        Ok(screening)
    }

    /// Creates or updates the screening record and its candidate row.
    pub async fn save(&self, principal: &Principal, form: ScreeningForm) -> Result<ScreeningSaved> {
        principal.require_staff()?;
        let mut screening = screening_from_fields(&form.fields)?;
        if screening.candidate_name.is_empty() || screening.role.is_empty() {
            return Err(Error::BadRequest(
                "Candidate Name and Role Interviewed For are required".into(),
            ));
        }

        if screening.candidate_id.is_empty() {
            screening.candidate_id = self.fresh_id().await;
        }

        let id = screening.candidate_id.clone();
        let name = screening.candidate_name.clone();
        self.folders.ensure(&name, &id).await?;

        screening.cv_file_path = match &form.cv_file {
            Some(file) if !file.filename.trim().is_empty() && !file.data.is_empty() => file
                .save_into(&self.folders.attachments(&name, &id))
                .await?
                .display()
                .to_string(),
            _ => form.field("cv_existing").to_string(),
        };

        self.persist(screening, principal).await
    }

    /// Imports the first row of an uploaded sheet as a brand new candidate.
    pub async fn import(
        &self,
        principal: &Principal,
        filename: &str,
        data: &[u8],
    ) -> Result<ScreeningSaved> {
        principal.require_staff()?;
        let row = import_service::parse_first_row(filename, data)?;

        let fields: HashMap<String, String> = import_service::import_columns()
            .into_iter()
            .filter_map(|column| row.get(column).map(|v| (column.to_string(), v.clone())))
            .collect();
        let mut screening = screening_from_fields(&fields)?;
        screening.candidate_id = self.fresh_id().await;
        screening.cv_file_path.clear();

        self.folders
            .ensure(&screening.candidate_name, &screening.candidate_id)
            .await?;
        let saved = self.persist(screening, principal).await?;
        tracing::info!(candidate_id = %saved.candidate_id, file = filename, "Screening imported");
        Ok(saved)
    }

    pub fn template(&self) -> Result<Vec<u8>> {
        import_service::template_csv()
    }

    /// Removes the screening and candidate rows and the candidate's folders.
    pub async fn delete(&self, principal: &Principal, id: &str) -> Result<()> {
        principal.require_staff()?;
        let removed = self
            .store
            .remove_from_sheets(&[SCREENING_SHEET, CANDIDATES_SHEET], |r| {
                Table::cell(r, "Candidate ID") == id
            })
            .await?;
        let folders = self.folders.remove_all(id).await?;
        if removed == 0 && folders == 0 {
            return Err(Error::NotFound(format!("Screening for {} not found", id)));
        }
        tracing::info!(candidate_id = id, removed, folders, by = %principal.username, "Screening deleted");
        Ok(())
    }

    async fn fresh_id(&self) -> String {
        let taken: Vec<String> = self
            .store
            .records::<Candidate>()
            .await
            .into_iter()
            .map(|c| c.candidate_id)
            .collect();
        naming::generate_unique_id(|id| taken.iter().any(|t| t == id))
    }

    async fn persist(&self, mut screening: Screening, principal: &Principal) -> Result<ScreeningSaved> {
        screening.timestamp = time::now_stamp();
        let id = screening.candidate_id.clone();

        let record = screening.clone();
        let created = self
            .store
            .update(SCREENING_SHEET, move |table: &mut Table| {
                let previous: Option<Screening> =
                    table.find(|r| Table::cell(r, "Candidate ID") == record.candidate_id);
                let mut record = record;
                if let Some(previous) = previous {
                    record.extra = previous.extra;
                }
                table.upsert_by(&["Candidate ID"], &record)
            })
            .await?;

        let source = screening.clone();
        self.store
            .update(CANDIDATES_SHEET, move |table: &mut Table| {
                let existing: Option<Candidate> =
                    table.find(|r| Table::cell(r, "Candidate ID") == source.candidate_id);
                let candidate = candidate_from_screening(existing, &source);
                table.upsert_by(&["Candidate ID"], &candidate)
            })
            .await?;

        tracing::info!(
            candidate_id = %id,
            created,
            by = %principal.username,
            "Screening saved"
        );
        Ok(ScreeningSaved {
            folder: naming::folder_name(&screening.candidate_name, &id),
            candidate_id: id,
            screening,
        })
    }
}

/// Builds a normalised screening record from submitted form fields.
pub fn screening_from_fields(fields: &HashMap<String, String>) -> Result<Screening> {
    let mut screening: Screening = row_to_record(fields)?;
    screening.extra.clear();

    let selected = fields
        .get("nationality_select")
        .map(|v| v.trim().to_string());
    if let Some(selected) = selected {
        screening.nationality = if selected == "Other" {
            fields
                .get("nationality_other")
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        } else {
            selected
        };
    }

    normalize_screening(&mut screening);
    Ok(screening)
}

pub fn normalize_screening(s: &mut Screening) {
    for value in [
        &mut s.candidate_id,
        &mut s.candidate_name,
        &mut s.role,
        &mut s.email,
        &mut s.phone,
        &mut s.total_experience,
        &mut s.relevant_experience,
        &mut s.current_organization,
        &mut s.current_title,
        &mut s.previous_roles,
        &mut s.screening_notes,
        &mut s.age,
        &mut s.family_status,
        &mut s.children,
        &mut s.current_location,
        &mut s.desired_location,
        &mut s.nationality,
        &mut s.iqama_profession,
        &mut s.current_compensation,
        &mut s.expected_compensation,
        &mut s.recorded_by,
        &mut s.requestor_username,
        &mut s.cv_file_path,
    ] {
        *value = value.trim().to_string();
    }

    s.gov_id = clean_gov_id(&s.gov_id);
    s.dob = s.dob.trim().to_string();
    if !s.dob.is_empty() && !time::is_ymd(&s.dob) {
        s.dob.clear();
    }
    s.highest_education = ChoiceField::Education.normalize(&s.highest_education);
    s.marital_status = ChoiceField::MaritalStatus.normalize(&s.marital_status);
    s.iqama_status = ChoiceField::IqamaStatus.normalize(&s.iqama_status);
    s.notice_period = ChoiceField::NoticePeriod.normalize(&s.notice_period);
    s.interviewed_before = ChoiceField::YesNo.normalize(&s.interviewed_before);
}

/// Spreadsheet tools turn numeric ids into floats; strip the `.0` they leave behind.
pub fn clean_gov_id(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}

/// The candidate row after a screening save. HR notes, requestor feedback and
/// an existing assessment survive; identity fields follow the screening.
pub fn candidate_from_screening(existing: Option<Candidate>, s: &Screening) -> Candidate {
    let mut candidate = existing.unwrap_or_default();
    if candidate.requestor_assessment.trim().is_empty() {
        candidate.requestor_assessment = DEFAULT_ASSESSMENT.to_string();
    }
    candidate.candidate_id = s.candidate_id.clone();
    candidate.candidate_name = s.candidate_name.clone();
    candidate.role = s.role.clone();
    candidate.nationality = s.nationality.clone();
    candidate.status = CandidateStatus::Screening;
    candidate.hr_owner = s.recorded_by.clone();
    candidate.next_action = NEXT_ACTION_AFTER_SCREENING.to_string();
    candidate.cv_file_path = s.cv_file_path.clone();
    candidate.requestor_username = s.requestor_username.clone();
    candidate.gov_id = s.gov_id.clone();
    candidate.last_updated = time::now_stamp();
    candidate
}
