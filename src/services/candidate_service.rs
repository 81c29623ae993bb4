use chrono::Duration;

use crate::database::{Table, WorkbookStore};
use crate::dto::candidate_dto::{
    CandidateDetail, CandidateListQuery, CommentPayload, DashboardResponse, DashboardTotals,
    StatusCount, UpdateMetaPayload,
};
use crate::error::{Error, Result};
use crate::middleware::auth::Principal;
use crate::models::{
    candidate::{Candidate, CANDIDATES_SHEET},
    offer::Offer,
    screening::Screening,
    shortlist::ShortlistItem,
    status::CandidateStatus,
    CANDIDATE_SHEETS,
};
use crate::services::{folder_service::FolderService, shortlist_service::present_checklist};
use crate::utils::{choices::ChoiceField, time};

const RECENT_LIMIT: usize = 10;

#[derive(Clone)]
pub struct CandidateService {
    store: WorkbookStore,
    folders: FolderService,
}

impl CandidateService {
    pub fn new(store: WorkbookStore, folders: FolderService) -> Self {
        Self { store, folders }
    }

    pub async fn all(&self) -> Vec<Candidate> {
        self.store.records::<Candidate>().await
    }

    pub async fn find(&self, id: &str) -> Option<Candidate> {
        self.all().await.into_iter().find(|c| c.candidate_id == id)
    }

    pub async fn get(&self, id: &str) -> Result<Candidate> {
        self.find(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    /// Loads a candidate the caller is allowed to see.
    pub async fn get_for(&self, principal: &Principal, id: &str) -> Result<Candidate> {
        let candidate = self.get(id).await?;
        principal.ensure_can_view(&candidate)?;
        Ok(candidate)
    }

    pub async fn list(&self, principal: &Principal, query: &CandidateListQuery) -> Vec<Candidate> {
        let name = lowered(query.name.as_deref());
        let role = lowered(query.role.as_deref());
        let status = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "All");
        let search_id = lowered(query.search_id.as_deref());

        let id_matches: Option<Vec<String>> = match &search_id {
            Some(needle) => Some(
                self.store
                    .records::<Screening>()
                    .await
                    .into_iter()
                    .filter(|s| {
                        s.candidate_id.to_lowercase().contains(needle.as_str())
                            || s.gov_id.to_lowercase().contains(needle.as_str())
                    })
                    .map(|s| s.candidate_id)
                    .collect(),
            ),
            None => None,
        };

        self.all()
            .await
            .into_iter()
            .filter(|c| match principal.requestor_scope() {
                Some(username) => c.is_assigned_to(username),
                None => true,
            })
            .filter(|c| {
                name.as_ref()
                    .map_or(true, |n| c.candidate_name.to_lowercase().contains(n.as_str()))
            })
            .filter(|c| {
                role.as_ref()
                    .map_or(true, |r| c.role.to_lowercase().contains(r.as_str()))
            })
            .filter(|c| status.map_or(true, |s| c.status.as_str() == s))
            .filter(|c| {
                id_matches
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&c.candidate_id))
            })
            .collect()
    }

    pub async fn detail(&self, principal: &Principal, id: &str) -> Result<CandidateDetail> {
        let candidate = self.get_for(principal, id).await?;

        let screening_cv = self
            .store
            .records::<Screening>()
            .await
            .into_iter()
            .find(|s| s.candidate_id == id)
            .map(|s| s.cv_file_path)
            .filter(|p| !p.trim().is_empty());
        let cv_path = screening_cv
            .or_else(|| Some(candidate.cv_file_path.clone()))
            .and_then(|p| self.folders.resolve(&p))
            .map(|p| p.display().to_string());

        let items: Vec<ShortlistItem> = self
            .store
            .records::<ShortlistItem>()
            .await
            .into_iter()
            .filter(|i| i.candidate_id == id)
            .collect();
        let checklist = present_checklist(&self.folders, &candidate, items);

        let offer = self
            .store
            .records::<Offer>()
            .await
            .into_iter()
            .rev()
            .find(|o| o.candidate_id == id);

        Ok(CandidateDetail {
            candidate,
            cv_path,
            checklist,
            offer,
        })
    }

    pub async fn update_meta(
        &self,
        principal: &Principal,
        id: &str,
        payload: UpdateMetaPayload,
    ) -> Result<Candidate> {
        principal.require_staff()?;
        let status = CandidateStatus::parse_known(&payload.status)
            .ok_or_else(|| Error::BadRequest(format!("Unknown status: {}", payload.status)))?;

        let updated = self
            .modify(id, |c| {
                c.status = status.clone();
                c.next_action = payload.next_action.trim().to_string();
                c.notes = payload.notes.trim().to_string();
            })
            .await?;
        tracing::info!(candidate_id = id, status = %status, by = %principal.username, "Candidate meta updated");
        Ok(updated)
    }

    pub async fn comment(
        &self,
        principal: &Principal,
        id: &str,
        payload: CommentPayload,
    ) -> Result<Candidate> {
        let candidate = self.get(id).await?;
        principal.ensure_can_view(&candidate)?;

        let action = ChoiceField::RequestorAction.normalize(&payload.requestor_action);
        let updated = self
            .modify(id, |c| {
                c.requestor_comments = payload.requestor_comments.trim().to_string();
                c.requestor_action = action.clone();
                c.suggested_interview_date = payload.suggested_interview_date.trim().to_string();
                c.suggested_interview_time = payload.suggested_interview_time.trim().to_string();
            })
            .await?;
        tracing::info!(candidate_id = id, by = %principal.username, "Requestor comment saved");
        Ok(updated)
    }

    /// Pipeline transition triggered by another workflow.
    pub async fn set_status(&self, id: &str, status: CandidateStatus) -> Result<Candidate> {
        let label = status.to_string();
        let updated = self.modify(id, |c| c.status = status).await?;
        tracing::info!(candidate_id = id, status = %label, "Candidate status changed");
        Ok(updated)
    }

    /// Applies `apply` to the candidate row and stamps `Last Updated`.
    async fn modify(&self, id: &str, apply: impl FnOnce(&mut Candidate)) -> Result<Candidate> {
        let id = id.to_string();
        self.store
            .update(CANDIDATES_SHEET, move |table: &mut Table| {
                let mut candidate: Candidate = table
                    .find(|r| Table::cell(r, "Candidate ID") == id)
                    .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))?;
                apply(&mut candidate);
                candidate.last_updated = time::now_stamp();
                table.upsert_by(&["Candidate ID"], &candidate)?;
                Ok(candidate)
            })
            .await
    }

    /// Removes the candidate's rows from every sheet and all of its folders.
    pub async fn delete(&self, principal: &Principal, id: &str) -> Result<()> {
        principal.require_staff()?;
        let removed_rows = self
            .store
            .remove_from_sheets(CANDIDATE_SHEETS, |r| Table::cell(r, "Candidate ID") == id)
            .await?;
        let removed_folders = self.folders.remove_all(id).await?;
        if removed_rows == 0 && removed_folders == 0 {
            return Err(Error::NotFound(format!("Candidate {} not found", id)));
        }
        tracing::info!(
            candidate_id = id,
            removed_rows,
            removed_folders,
            by = %principal.username,
            "Candidate deleted"
        );
        Ok(())
    }

    pub async fn dashboard(&self, principal: &Principal) -> DashboardResponse {
        let candidates: Vec<Candidate> = self
            .all()
            .await
            .into_iter()
            .filter(|c| principal.can_view(c))
            .collect();
        summarize(candidates, time::now())
    }
}

fn lowered(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Pipeline labels in order, each with its count, then any unlisted labels
/// found on the sheet in first-seen order.
pub fn status_counts(candidates: &[Candidate]) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = CandidateStatus::ALL
        .into_iter()
        .map(|s| StatusCount {
            label: s.as_str().to_string(),
            count: 0,
        })
        .collect();
    for c in candidates {
        let label = c.status.as_str();
        match counts.iter_mut().find(|s| s.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(StatusCount {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

pub fn summarize(candidates: Vec<Candidate>, now: chrono::NaiveDateTime) -> DashboardResponse {
    let count = |status: CandidateStatus| candidates.iter().filter(|c| c.status == status).count();
    let week_ago = now - Duration::days(7);

    let totals = DashboardTotals {
        total: candidates.len(),
        updated_last_week: candidates
            .iter()
            .filter_map(|c| time::parse_stamp(&c.last_updated))
            .filter(|t| *t >= week_ago)
            .count(),
        with_cv: candidates
            .iter()
            .filter(|c| !c.cv_file_path.trim().is_empty())
            .count(),
        shortlisted: count(CandidateStatus::Shortlist),
        interview: count(CandidateStatus::Interview) + count(CandidateStatus::SecondInterview),
        offer_issued: count(CandidateStatus::OfferIssued),
        offer_accepted: count(CandidateStatus::OfferAccepted),
        on_hold: count(CandidateStatus::OnHold),
        rejected: count(CandidateStatus::Rejected),
    };
    let statuses = status_counts(&candidates);

    let mut recent = candidates;
    recent.sort_by_key(|c| std::cmp::Reverse(time::parse_stamp(&c.last_updated)));
    recent.truncate(RECENT_LIMIT);

    DashboardResponse {
        totals,
        statuses,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, status: CandidateStatus, updated: &str, cv: &str) -> Candidate {
        Candidate {
            candidate_id: id.into(),
            candidate_name: id.into(),
            status,
            last_updated: updated.into(),
            cv_file_path: cv.into(),
            ..Default::default()
        }
    }

    #[test]
    fn dashboard_totals_follow_statuses() {
        let now = time::parse_stamp("2024-06-10 12:00:00").unwrap();
        let rows = vec![
            candidate("A", CandidateStatus::Interview, "2024-06-09 10:00:00", "/x.pdf"),
            candidate("B", CandidateStatus::SecondInterview, "2024-05-01 10:00:00", ""),
            candidate("C", CandidateStatus::OfferIssued, "", ""),
            candidate("D", CandidateStatus::Rejected, "2024-06-10 09:00:00", ""),
        ];
        let dash = summarize(rows, now);
        assert_eq!(dash.totals.total, 4);
        assert_eq!(dash.totals.interview, 2);
        assert_eq!(dash.totals.updated_last_week, 2);
        assert_eq!(dash.totals.with_cv, 1);
        assert_eq!(dash.statuses.len(), CandidateStatus::ALL.len());
        assert_eq!(dash.statuses[0].label, "Screening");
        assert_eq!(dash.recent[0].candidate_id, "D");
        assert_eq!(dash.recent.last().unwrap().candidate_id, "C");
    }

    #[test]
    fn unlisted_statuses_are_counted_separately() {
        let now = time::parse_stamp("2024-06-10 12:00:00").unwrap();
        let rows = vec![
            candidate("A", CandidateStatus::Custom("Hired".into()), "", ""),
            candidate("B", CandidateStatus::Custom("Hired".into()), "", ""),
            candidate("C", CandidateStatus::Other, "", ""),
        ];
        let dash = summarize(rows, now);
        assert_eq!(dash.statuses.len(), CandidateStatus::ALL.len() + 1);
        let hired = dash.statuses.last().unwrap();
        assert_eq!((hired.label.as_str(), hired.count), ("Hired", 2));
        let other = dash.statuses.iter().find(|s| s.label == "Other").unwrap();
        assert_eq!(other.count, 1);
    }
}
