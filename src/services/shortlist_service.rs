use crate::database::{Table, WorkbookStore};
use crate::dto::shortlist_dto::ChecklistSubmission;
use crate::error::{Error, Result};
use crate::middleware::auth::Principal;
use crate::models::{
    candidate::Candidate,
    shortlist::{ShortlistItem, DEFAULT_ITEMS, SHORTLIST_SHEET},
};
use crate::services::folder_service::FolderService;
use crate::utils::{choices::ChoiceField, time};

/// A submitted row after its upload, if any, has been stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChecklistRow {
    pub item: String,
    pub received: String,
    pub notes: String,
    pub uploaded_path: Option<String>,
}

#[derive(Clone)]
pub struct ShortlistService {
    store: WorkbookStore,
    folders: FolderService,
}

impl ShortlistService {
    pub fn new(store: WorkbookStore, folders: FolderService) -> Self {
        Self { store, folders }
    }

    async fn candidate(&self, id: &str) -> Result<Candidate> {
        self.store
            .records::<Candidate>()
            .await
            .into_iter()
            .find(|c| c.candidate_id == id)
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    pub async fn checklist(&self, principal: &Principal, id: &str) -> Result<Vec<ShortlistItem>> {
        let candidate = self.candidate(id).await?;
        principal.ensure_can_view(&candidate)?;
        let items = self
            .store
            .records::<ShortlistItem>()
            .await
            .into_iter()
            .filter(|i| i.candidate_id == id)
            .collect();
        Ok(present_checklist(&self.folders, &candidate, items))
    }

    /// Replaces the candidate's whole checklist with the submitted rows.
    pub async fn save(
        &self,
        principal: &Principal,
        id: &str,
        submission: ChecklistSubmission,
    ) -> Result<Vec<ShortlistItem>> {
        principal.require_staff()?;
        let candidate = self.candidate(id).await?;
        let attachments = self
            .folders
            .attachments(&candidate.candidate_name, &candidate.candidate_id);

        // Uploads are stored before the sheet is touched and are not rolled back.
        let mut rows = Vec::with_capacity(submission.rows.len());
        for input in submission.rows {
            let item = input.item.trim().to_string();
            if item.is_empty() {
                continue;
            }
            let uploaded_path = match &input.upload {
                Some(file) if !file.data.is_empty() => {
                    Some(file.save_into(&attachments).await?.display().to_string())
                }
                _ => None,
            };
            rows.push(ChecklistRow {
                item,
                received: input.received,
                notes: input.notes,
                uploaded_path,
            });
        }

        let candidate_id = candidate.candidate_id.clone();
        let candidate_name = candidate.candidate_name.clone();
        let new_item = submission.new_item;
        let saved = self
            .store
            .update(SHORTLIST_SHEET, move |table: &mut Table| {
                let previous: Vec<ShortlistItem> = table
                    .records::<ShortlistItem>()
                    .into_iter()
                    .filter(|i| i.candidate_id == candidate_id)
                    .collect();
                let items = merge_checklist(
                    &candidate_id,
                    &candidate_name,
                    &previous,
                    rows,
                    &new_item,
                    &time::now_stamp(),
                );
                if items.is_empty() {
                    return Err(Error::BadRequest("Checklist empty".into()));
                }
                table.remove_where(|r| Table::cell(r, "Candidate ID") == candidate_id);
                for item in &items {
                    table.push(item)?;
                }
                Ok(items)
            })
            .await?;

        tracing::info!(candidate_id = id, items = saved.len(), by = %principal.username, "Shortlist saved");
        Ok(saved)
    }

    pub async fn remove_item(&self, principal: &Principal, id: &str, item: &str) -> Result<()> {
        principal.require_staff()?;
        let (id_owned, item_owned) = (id.to_string(), item.to_string());
        self.store
            .update(SHORTLIST_SHEET, move |table: &mut Table| {
                let removed = table.remove_where(|r| {
                    Table::cell(r, "Candidate ID") == id_owned && Table::cell(r, "Item") == item_owned
                });
                if removed == 0 {
                    return Err(Error::NotFound(format!("Checklist item {} not found", item_owned)));
                }
                Ok(())
            })
            .await?;
        tracing::info!(candidate_id = id, item, "Shortlist item removed");
        Ok(())
    }

    /// Clears the mapped file of an item but keeps the row. The file stays on disk.
    pub async fn remove_attachment(&self, principal: &Principal, id: &str, item: &str) -> Result<()> {
        principal.require_staff()?;
        let (id_owned, item_owned) = (id.to_string(), item.to_string());
        self.store
            .update(SHORTLIST_SHEET, move |table: &mut Table| {
                let changed = table.update_where::<ShortlistItem>(
                    |r| Table::cell(r, "Candidate ID") == id_owned && Table::cell(r, "Item") == item_owned,
                    |i| i.mapped_file_path.clear(),
                )?;
                if changed == 0 {
                    return Err(Error::NotFound(format!("Checklist item {} not found", item_owned)));
                }
                Ok(())
            })
            .await?;
        tracing::info!(candidate_id = id, item, "Shortlist attachment cleared");
        Ok(())
    }
}

/// Builds the new item set: uploads force `Yes`, rows without an upload keep
/// the previous mapped file of the same item name, and `new_item` is added
/// unchecked. Later rows with a repeated name replace earlier ones.
pub fn merge_checklist(
    candidate_id: &str,
    candidate_name: &str,
    previous: &[ShortlistItem],
    rows: Vec<ChecklistRow>,
    new_item: &str,
    stamp: &str,
) -> Vec<ShortlistItem> {
    let mut items: Vec<ShortlistItem> = Vec::new();
    let mut put = |item: ShortlistItem| match items.iter_mut().find(|i| i.item == item.item) {
        Some(existing) => *existing = item,
        None => items.push(item),
    };

    for row in rows {
        let (received, mapped) = match row.uploaded_path {
            Some(path) => ("Yes".to_string(), path),
            None => (
                ChoiceField::YesNo.normalize(&row.received),
                previous
                    .iter()
                    .find(|p| p.item == row.item)
                    .map(|p| p.mapped_file_path.trim().to_string())
                    .unwrap_or_default(),
            ),
        };
        put(ShortlistItem {
            candidate_id: candidate_id.to_string(),
            candidate_name: candidate_name.to_string(),
            item: row.item,
            received,
            notes: row.notes.trim().to_string(),
            mapped_file_path: mapped,
            timestamp: stamp.to_string(),
            ..Default::default()
        });
    }

    let new_item = new_item.trim();
    if !new_item.is_empty() && !items.iter().any(|i| i.item == new_item) {
        items.push(ShortlistItem {
            candidate_id: candidate_id.to_string(),
            candidate_name: candidate_name.to_string(),
            item: new_item.to_string(),
            received: "No".to_string(),
            timestamp: stamp.to_string(),
            ..Default::default()
        });
    }
    items
}

/// Checklist as shown to users: the default items when nothing is saved,
/// and mapped files hidden when they no longer resolve.
pub fn present_checklist(
    folders: &FolderService,
    candidate: &Candidate,
    items: Vec<ShortlistItem>,
) -> Vec<ShortlistItem> {
    if items.is_empty() {
        return DEFAULT_ITEMS
            .iter()
            .map(|name| ShortlistItem {
                candidate_id: candidate.candidate_id.clone(),
                candidate_name: candidate.candidate_name.clone(),
                item: name.to_string(),
                received: "No".to_string(),
                ..Default::default()
            })
            .collect();
    }
    items
        .into_iter()
        .map(|mut item| {
            item.received = ChoiceField::YesNo.normalize(&item.received);
            item.mapped_file_path = folders
                .resolve(&item.mapped_file_path)
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prev(item: &str, path: &str) -> ShortlistItem {
        ShortlistItem {
            candidate_id: "C1".into(),
            item: item.into(),
            received: "Yes".into(),
            mapped_file_path: path.into(),
            ..Default::default()
        }
    }

    fn row(item: &str, received: &str, upload: Option<&str>) -> ChecklistRow {
        ChecklistRow {
            item: item.into(),
            received: received.into(),
            notes: String::new(),
            uploaded_path: upload.map(Into::into),
        }
    }

    #[test]
    fn upload_forces_yes_and_missing_upload_keeps_previous_path() {
        let previous = vec![prev("CV/Resume", "/c/cv.pdf"), prev("Passport/Iqama Copy", "/c/p.pdf")];
        let items = merge_checklist(
            "C1",
            "Jane",
            &previous,
            vec![
                row("CV/Resume", "no", None),
                row("Passport/Iqama Copy", "No", Some("/c/new.pdf")),
                row("Education Certificate", "", None),
            ],
            "",
            "2024-01-01 00:00:00",
        );
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].mapped_file_path, "/c/cv.pdf");
        assert_eq!(items[0].received, "No");
        assert_eq!(items[1].received, "Yes");
        assert_eq!(items[1].mapped_file_path, "/c/new.pdf");
        assert_eq!(items[2].mapped_file_path, "");
        assert_eq!(items[2].received, "No");
    }

    #[test]
    fn new_item_is_added_unchecked_once() {
        let items = merge_checklist("C1", "Jane", &[], vec![row("CV/Resume", "Yes", None)], "Medical", "t");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].item, "Medical");
        assert_eq!(items[1].received, "No");

        let items = merge_checklist("C1", "Jane", &[], vec![row("Medical", "Yes", None)], "Medical", "t");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].received, "Yes");
    }

    #[test]
    fn repeated_names_keep_the_last_row() {
        let items = merge_checklist(
            "C1",
            "Jane",
            &[],
            vec![row("CV/Resume", "No", None), row("CV/Resume", "Yes", None)],
            "",
            "t",
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].received, "Yes");
    }

    #[test]
    fn empty_checklist_presents_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let folders = FolderService::new(dir.path().to_path_buf());
        let candidate = Candidate {
            candidate_id: "C1".into(),
            ..Default::default()
        };
        let items = present_checklist(&folders, &candidate, Vec::new());
        assert_eq!(items.len(), DEFAULT_ITEMS.len());
        assert!(items.iter().all(|i| i.received == "No"));

        let dangling = present_checklist(&folders, &candidate, vec![prev("CV/Resume", "/nowhere/cv.pdf")]);
        assert_eq!(dangling[0].mapped_file_path, "");
    }
}
