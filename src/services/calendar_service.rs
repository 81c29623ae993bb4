//! Interview invitations: `.ics` files and prepared `mailto:` links.

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime, TimeZone, Utc};
use icalendar::{Calendar, Component, Event, EventLike, Property};
use tokio::fs;
use uuid::Uuid;

use crate::error::Result;

pub const INVITE_DESCRIPTION: &str = "Interview scheduled via HR System";

#[derive(Debug, Clone, Default)]
pub struct InviteEvent {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub location: String,
    pub meeting_link: String,
    pub attendee: Option<String>,
}

impl InviteEvent {
    /// A link moves into the description and the location only points at it.
    fn full_location(&self) -> String {
        if self.meeting_link.is_empty() {
            self.location.clone()
        } else if self.location.is_empty() {
            "Online".to_string()
        } else {
            format!("{} (Link in desc)", self.location)
        }
    }

    fn full_description(&self) -> String {
        if self.meeting_link.is_empty() {
            self.description.clone()
        } else {
            format!("Meeting Link: {}\n\n{}", self.meeting_link, self.description)
        }
    }
}

fn to_utc(local: NaiveDateTime) -> chrono::DateTime<Utc> {
    match Local.from_local_datetime(&local).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&local),
    }
}

pub fn render_invite(invite: &InviteEvent, uid: &str) -> String {
    let mut event = Event::new();
    event
        .uid(uid)
        .summary(&invite.summary)
        .description(&invite.full_description())
        .location(&invite.full_location())
        .starts(to_utc(invite.start))
        .ends(to_utc(invite.start + Duration::hours(1)));

    if let Some(email) = invite.attendee.as_deref().filter(|e| !e.trim().is_empty()) {
        event.append_property(
            Property::new("ATTENDEE", &format!("MAILTO:{}", email.trim()))
                .add_parameter("CN", "Candidate")
                .add_parameter("ROLE", "REQ-PARTICIPANT")
                .done(),
        );
    }

    let mut calendar = Calendar::new();
    calendar.push(event.done());
    calendar.done().to_string()
}

/// Writes `<uid>.ics` into `dir` and returns its path.
pub async fn write_invite(dir: &Path, invite: &InviteEvent) -> Result<PathBuf> {
    let uid = Uuid::new_v4().simple().to_string();
    fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.ics", uid));
    fs::write(&path, render_invite(invite, &uid)).await?;
    tracing::info!(path = %path.display(), "Calendar invite written");
    Ok(path)
}

pub fn mailto(email: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        urlencoding::encode(email.trim()),
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn invite(link: &str, attendee: Option<&str>) -> InviteEvent {
        InviteEvent {
            summary: "Interview — Jane (Driver)".into(),
            description: INVITE_DESCRIPTION.into(),
            start: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            location: "Riyadh".into(),
            meeting_link: link.into(),
            attendee: attendee.map(Into::into),
        }
    }

    #[test]
    fn invite_carries_event_fields() {
        let ics = render_invite(&invite("", Some("jane@example.com")), "abc");
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("UID:abc"));
        assert!(ics.contains("SUMMARY:Interview — Jane (Driver)"));
        assert!(ics.contains("LOCATION:Riyadh"));
        assert!(ics.contains("DTSTART"));
        assert!(ics.contains("DTEND"));
        assert!(ics.contains("MAILTO:jane@example.com"));
    }

    #[test]
    fn meeting_link_moves_into_description() {
        let with_link = invite("https://meet.example/x", None);
        assert_eq!(with_link.full_location(), "Riyadh (Link in desc)");
        assert!(with_link.full_description().starts_with("Meeting Link: https://meet.example/x"));

        let online = InviteEvent {
            location: String::new(),
            ..with_link
        };
        assert_eq!(online.full_location(), "Online");
        assert!(!render_invite(&online, "u").contains("ATTENDEE"));
    }

    #[test]
    fn mailto_is_percent_encoded() {
        let url = mailto("jane@example.com", "Interview Invite", "Dear Jane,\r\n");
        assert_eq!(
            url,
            "mailto:jane%40example.com?subject=Interview%20Invite&body=Dear%20Jane%2C%0D%0A"
        );
    }

    #[tokio::test]
    async fn invite_file_is_named_by_uid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_invite(dir.path(), &invite("", None)).await.unwrap();
        assert_eq!(path.extension().unwrap(), "ics");
        let body = std::fs::read_to_string(&path).unwrap();
        let uid = path.file_stem().unwrap().to_str().unwrap();
        assert!(body.contains(&format!("UID:{}", uid)));
    }
}
