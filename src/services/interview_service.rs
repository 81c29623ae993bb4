use std::collections::HashSet;
use std::path::PathBuf;

use crate::database::{table::row_to_record, Row, SheetRecord, Table, WorkbookStore};
use crate::dto::interview_dto::{InterviewView, SchedulePayload, ScheduleResponse};
use crate::error::{Error, Result};
use crate::middleware::auth::Principal;
use crate::models::{
    candidate::Candidate,
    interview::{Interview, INTERVIEWS_SHEET},
    screening::Screening,
    status::{CandidateStatus, InterviewMode, InterviewStatus},
};
use crate::services::{
    calendar_service::{self, InviteEvent, INVITE_DESCRIPTION},
    candidate_service::CandidateService,
    folder_service::FolderService,
};
use crate::utils::time;

#[derive(Clone)]
pub struct InterviewService {
    store: WorkbookStore,
    folders: FolderService,
    candidates: CandidateService,
    onsite_location: String,
}

impl InterviewService {
    pub fn new(
        store: WorkbookStore,
        folders: FolderService,
        candidates: CandidateService,
        onsite_location: String,
    ) -> Self {
        Self {
            store,
            folders,
            candidates,
            onsite_location,
        }
    }

    pub async fn list(&self, principal: &Principal) -> Vec<InterviewView> {
        let visible: Option<HashSet<String>> = match principal.requestor_scope() {
            Some(username) => Some(
                self.candidates
                    .all()
                    .await
                    .into_iter()
                    .filter(|c| c.is_assigned_to(username))
                    .map(|c| c.candidate_id)
                    .collect(),
            ),
            None => None,
        };
        let today = time::today();

        self.store
            .records::<Interview>()
            .await
            .into_iter()
            .filter(|i| visible.as_ref().map_or(true, |ids| ids.contains(&i.candidate_id)))
            .map(|interview| InterviewView {
                is_past: time::parse_date(&interview.interview_date).map_or(false, |d| d < today),
                interview,
            })
            .collect()
    }

    /// Creates or reschedules a round, writes its calendar invite and moves the
    /// candidate to `Interview`.
    pub async fn schedule(
        &self,
        principal: &Principal,
        payload: SchedulePayload,
    ) -> Result<ScheduleResponse> {
        principal.require_staff()?;
        let date = payload.interview_date.trim().to_string();
        let slot_time = payload.interview_time.trim().to_string();
        let start = time::parse_slot(&date, &slot_time)
            .ok_or_else(|| Error::BadRequest("Bad date/time".into()))?;

        let candidate = self.candidates.get(payload.candidate_id.trim()).await?;
        let screening = self
            .store
            .records::<Screening>()
            .await
            .into_iter()
            .find(|s| s.candidate_id == candidate.candidate_id);
        let email = screening
            .as_ref()
            .map(|s| s.email.trim().to_string())
            .unwrap_or_default();
        let position = first_non_empty(&[
            payload.position.as_str(),
            candidate.role.as_str(),
            screening.as_ref().map_or("", |s| s.role.as_str()),
        ]);

        let (mode, location, meeting_link) = match InterviewMode::parse(&payload.mode) {
            Some(InterviewMode::Onsite) => (
                InterviewMode::Onsite.as_str().to_string(),
                self.onsite_location.clone(),
                String::new(),
            ),
            parsed => (
                parsed.map_or_else(|| payload.mode.trim().to_string(), |m| m.as_str().to_string()),
                payload.location.trim().to_string(),
                payload.meeting_link.trim().to_string(),
            ),
        };

        let name = candidate.candidate_name.trim().to_string();
        let invite = InviteEvent {
            summary: invite_summary(payload.is_second, &name, &position),
            description: INVITE_DESCRIPTION.to_string(),
            start,
            location: location.clone(),
            meeting_link: meeting_link.clone(),
            attendee: Some(email.clone()).filter(|e| !e.is_empty()),
        };
        let ics_path = calendar_service::write_invite(
            &self.folders.candidate_root(&name, &candidate.candidate_id),
            &invite,
        )
        .await?
        .display()
        .to_string();

        let interview = Interview {
            candidate_id: candidate.candidate_id.clone(),
            candidate_name: name.clone(),
            position: position.clone(),
            interview_date: date.clone(),
            interview_time: slot_time.clone(),
            mode,
            location: location.clone(),
            meeting_link: meeting_link.clone(),
            interviewer: payload.interviewer.trim().to_string(),
            ics_path: ics_path.clone(),
            timestamp: time::now_stamp(),
            email: email.clone(),
            created_by: principal.username.clone(),
            ..Default::default()
        };
        let is_second = payload.is_second;
        let (interview, created) = self
            .store
            .update(INTERVIEWS_SHEET, move |table: &mut Table| {
                place_interview(table, interview, is_second)
            })
            .await?;

        self.candidates
            .set_status(&candidate.candidate_id, CandidateStatus::Interview)
            .await?;

        tracing::info!(
            candidate_id = %interview.candidate_id,
            round = interview.round,
            created,
            by = %principal.username,
            "Interview scheduled"
        );

        let body = invite_body(is_second, &name, &position, &date, &slot_time, &location, &meeting_link);
        let mailto = (!email.is_empty()).then(|| {
            let subject = invite_subject(is_second, &name, &position, &date, &slot_time);
            calendar_service::mailto(&email, &subject, &body)
        });

        Ok(ScheduleResponse {
            interview,
            created,
            ics_path,
            mailto,
            body,
        })
    }

    /// `First Interview` → `First Interview Completed`, likewise for the second round.
    pub async fn complete(&self, principal: &Principal, id: &str, round: u32) -> Result<Interview> {
        self.transition(principal, id, round, InterviewStatus::completed, "Interview completed")
            .await
    }

    pub async fn undo(&self, principal: &Principal, id: &str, round: u32) -> Result<Interview> {
        self.transition(principal, id, round, InterviewStatus::reopened, "Interview completion undone")
            .await
    }

    async fn transition(
        &self,
        principal: &Principal,
        id: &str,
        round: u32,
        next: fn(&InterviewStatus) -> Option<InterviewStatus>,
        message: &'static str,
    ) -> Result<Interview> {
        principal.require_staff()?;
        let key = id.to_string();
        let (interview, changed) = self
            .store
            .update(INTERVIEWS_SHEET, move |table: &mut Table| {
                let current: Interview = table
                    .find(|r| is_round(r, &key, round))
                    .ok_or_else(|| not_found(&key, round))?;
                let Some(status) = next(&current.status) else {
                    return Ok((current, false));
                };
                let mut updated = current;
                updated.status = status;
                let target = updated.clone();
                table.update_where::<Interview>(
                    |r| is_round(r, &key, round),
                    |row| row.status = target.status.clone(),
                )?;
                Ok((updated, true))
            })
            .await?;

        if changed {
            tracing::info!(candidate_id = id, round, status = interview.status.as_str(), "{}", message);
        }
        Ok(interview)
    }

    pub async fn delete(&self, principal: &Principal, id: &str, round: u32) -> Result<()> {
        principal.require_staff()?;
        let key = id.to_string();
        self.store
            .update(INTERVIEWS_SHEET, move |table: &mut Table| {
                match table.remove_where(|r| is_round(r, &key, round)) {
                    0 => Err(not_found(&key, round)),
                    _ => Ok(()),
                }
            })
            .await?;
        tracing::info!(candidate_id = id, round, by = %principal.username, "Interview deleted");
        Ok(())
    }

    /// The `.ics` file of a round, when it still exists.
    pub async fn invite(&self, principal: &Principal, id: &str, round: u32) -> Result<PathBuf> {
        let candidate: Candidate = self.candidates.get(id).await?;
        principal.ensure_can_view(&candidate)?;
        let interview = self
            .store
            .records::<Interview>()
            .await
            .into_iter()
            .find(|i| i.candidate_id == id && i.round == round)
            .ok_or_else(|| not_found(id, round))?;
        self.folders
            .resolve(&interview.ics_path)
            .ok_or_else(|| Error::NotFound("Calendar invite file is missing".into()))
    }
}

fn not_found(id: &str, round: u32) -> Error {
    Error::NotFound(format!("Interview round {} for {} not found", round, id))
}

fn is_round(row: &Row, id: &str, round: u32) -> bool {
    Table::cell(row, "Candidate ID") == id
        && row_to_record::<Interview>(row).map_or(false, |i| i.round == round)
}

fn is_first_round(interview: &Interview, id: &str) -> bool {
    interview.candidate_id == id && interview.round <= 1 && !interview.status.is_second_round()
}

/// Write policy for a scheduled round. A first round updates the candidate's
/// existing first-round row in place; a second round is always appended with
/// the next free round number (at least 2). Returns the stored row and whether
/// it was appended.
pub fn place_interview(
    table: &mut Table,
    mut interview: Interview,
    is_second: bool,
) -> Result<(Interview, bool)> {
    table.ensure_columns(Interview::COLUMNS);
    let id = interview.candidate_id.clone();
    let existing: Vec<Interview> = table
        .records::<Interview>()
        .into_iter()
        .filter(|i| i.candidate_id == id)
        .collect();

    if is_second {
        interview.round = existing.iter().map(|i| i.round).max().unwrap_or(0).max(1) + 1;
        interview.status = InterviewStatus::SecondInterview;
        table.push(&interview)?;
        return Ok((interview, true));
    }

    interview.status = InterviewStatus::FirstInterview;
    match existing.iter().find(|i| is_first_round(i, &id)) {
        Some(first) => {
            interview.round = first.round;
            interview.extra = first.extra.clone();
            let replacement = interview.clone();
            let mut replaced = false;
            table.update_where::<Interview>(
                |r| row_to_record::<Interview>(r).map_or(false, |i| is_first_round(&i, &id)),
                |row| {
                    if !replaced {
                        *row = replacement.clone();
                        replaced = true;
                    }
                },
            )?;
            Ok((interview, false))
        }
        None => {
            interview.round = 1;
            table.push(&interview)?;
            Ok((interview, true))
        }
    }
}

fn first_non_empty(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub fn invite_summary(is_second: bool, name: &str, position: &str) -> String {
    let kind = if is_second { "Second Interview" } else { "Interview" };
    format!("{} — {} ({})", kind, name, position)
}

pub fn invite_subject(is_second: bool, name: &str, position: &str, date: &str, slot: &str) -> String {
    let kind = if is_second {
        "Second Interview Invite"
    } else {
        "Interview Invite"
    };
    format!("{} – {} – {} – {} {}", kind, name, position, date, slot)
}

pub fn invite_body(
    is_second: bool,
    name: &str,
    position: &str,
    date: &str,
    slot: &str,
    location: &str,
    meeting_link: &str,
) -> String {
    let mut lines = vec![
        format!("Dear {},", name),
        String::new(),
        if is_second {
            "You're invited for a second interview. Details below:".to_string()
        } else {
            "You're invited for an interview. Details below:".to_string()
        },
        format!("- Position: {}", position),
        format!("- Date: {}", date),
        format!("- Time: {}", slot),
        format!("- Location: {}", location),
    ];
    if !meeting_link.is_empty() {
        lines.push(format!("- Link: {}", meeting_link));
    }
    lines.extend([String::new(), String::new(), "Best regards,".to_string()]);
    lines.join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interview(id: &str, date: &str) -> Interview {
        Interview {
            candidate_id: id.into(),
            candidate_name: "Jane".into(),
            interview_date: date.into(),
            interview_time: "10:00".into(),
            ..Default::default()
        }
    }

    fn rounds(table: &Table, id: &str) -> Vec<(u32, InterviewStatus)> {
        table
            .records::<Interview>()
            .into_iter()
            .filter(|i| i.candidate_id == id)
            .map(|i| (i.round, i.status))
            .collect()
    }

    #[test]
    fn first_round_is_updated_in_place() {
        let mut table = Table::default();
        let (first, created) = place_interview(&mut table, interview("C1", "2024-05-01"), false).unwrap();
        assert!(created);
        assert_eq!(first.round, 1);

        let (again, created) = place_interview(&mut table, interview("C1", "2024-05-09"), false).unwrap();
        assert!(!created);
        assert_eq!(again.round, 1);
        assert_eq!(table.len(), 1);
        let stored: Interview = table.records().remove(0);
        assert_eq!(stored.interview_date, "2024-05-09");
        assert_eq!(stored.status, InterviewStatus::FirstInterview);
    }

    #[test]
    fn second_rounds_always_append() {
        let mut table = Table::default();
        place_interview(&mut table, interview("C1", "2024-05-01"), false).unwrap();
        table
            .update_where::<Interview>(|_| true, |i| i.status = InterviewStatus::FirstInterviewCompleted)
            .unwrap();

        let (second, created) = place_interview(&mut table, interview("C1", "2024-05-10"), true).unwrap();
        assert!(created);
        assert_eq!(second.round, 2);
        let (third, _) = place_interview(&mut table, interview("C1", "2024-05-20"), true).unwrap();
        assert_eq!(third.round, 3);

        assert_eq!(
            rounds(&table, "C1"),
            vec![
                (1, InterviewStatus::FirstInterviewCompleted),
                (2, InterviewStatus::SecondInterview),
                (3, InterviewStatus::SecondInterview),
            ]
        );

        // Rescheduling the first round leaves the second-round rows alone.
        let (first, created) = place_interview(&mut table, interview("C1", "2024-06-01"), false).unwrap();
        assert!(!created);
        assert_eq!(first.round, 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn other_candidates_are_untouched() {
        let mut table = Table::default();
        place_interview(&mut table, interview("C1", "2024-05-01"), false).unwrap();
        let (other, created) = place_interview(&mut table, interview("C2", "2024-05-02"), false).unwrap();
        assert!(created);
        assert_eq!(other.round, 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn invite_texts_follow_round() {
        assert_eq!(invite_summary(false, "Jane", "Driver"), "Interview — Jane (Driver)");
        assert_eq!(
            invite_subject(true, "Jane", "Driver", "2024-05-01", "10:00"),
            "Second Interview Invite – Jane – Driver – 2024-05-01 10:00"
        );
        let body = invite_body(false, "Jane", "Driver", "2024-05-01", "10:00", "Riyadh", "https://m/x");
        assert!(body.starts_with("Dear Jane,\r\n\r\nYou're invited for an interview."));
        assert!(body.contains("- Link: https://m/x"));
        assert!(body.ends_with("Best regards,"));
    }
}
