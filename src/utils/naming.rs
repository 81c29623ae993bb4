//! Candidate identifiers and the folder names derived from them.
//!
//! Folder names are recomputed from `(name, id)` every time a candidate's
//! directory is needed, so the filtering rule below must stay stable: existing
//! folders on disk are found by exact string match, never by a stored path.

use chrono::Local;
use uuid::Uuid;

pub const ID_PREFIX: &str = "CAND";
const MAX_ID_ATTEMPTS: usize = 16;

/// `CAND-YYYYMMDD-XXXXXX` with six upper-case hex characters.
pub fn generate_id() -> String {
    let today = Local::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("{}-{}-{}", ID_PREFIX, today, suffix)
}

/// Draws ids until one is not taken. After the attempt budget the last draw is
/// returned; with 24 bits of suffix per day that path is not expected in practice.
pub fn generate_unique_id(is_taken: impl Fn(&str) -> bool) -> String {
    let mut id = generate_id();
    for _ in 1..MAX_ID_ATTEMPTS {
        if !is_taken(&id) {
            return id;
        }
        tracing::warn!(candidate_id = %id, "Generated candidate id collides, drawing again");
        id = generate_id();
    }
    id
}

/// Keeps letters, digits, space, underscore and hyphen, trims and turns
/// spaces into underscores.
fn path_safe(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    kept.trim().replace(' ', "_")
}

/// `<name>_<id>` with both parts reduced to path-safe characters.
pub fn folder_name(name: &str, id: &str) -> String {
    format!("{}{}", path_safe(name), folder_suffix(id))
}

/// Suffix every folder of candidate `id` ends with, whatever name it was created under.
pub fn folder_suffix(id: &str) -> String {
    format!("_{}", path_safe(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_candidate_id(s: &str) -> bool {
        let mut parts = s.splitn(3, '-');
        let (Some(prefix), Some(date), Some(suffix)) = (parts.next(), parts.next(), parts.next()) else {
            return false;
        };
        prefix == ID_PREFIX
            && date.len() == 8
            && date.chars().all(|c| c.is_ascii_digit())
            && suffix.len() == 6
            && suffix
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    }

    #[test]
    fn generated_ids_match_format() {
        for _ in 0..50 {
            let id = generate_id();
            assert!(is_candidate_id(&id), "bad id {}", id);
        }
        assert!(!is_candidate_id("CAND-2024-ABCDEF"));
        assert!(!is_candidate_id("CAND-20240101-abcdef"));
    }

    #[test]
    fn unique_id_skips_taken_values() {
        let first = generate_id();
        let id = generate_unique_id(|candidate| candidate == first);
        assert_ne!(id, first);
        assert!(is_candidate_id(&id));
    }

    #[test]
    fn folder_name_filters_and_is_deterministic() {
        let id = "CAND-20240101-ABC123";
        assert_eq!(
            folder_name("Jane  O'Doe (HR)", id),
            "Jane__ODoe_HR_CAND-20240101-ABC123"
        );
        assert_eq!(folder_name("  Ali-Hassan_2 ", id), "Ali-Hassan_2_CAND-20240101-ABC123");
        assert_eq!(folder_name("Jane Doe", id), folder_name("Jane Doe", id));
    }

    #[test]
    fn folder_name_output_alphabet() {
        let id = "CAND-20240101-ABC123";
        let out = folder_name("Mr. José/../Ñúñez <x@y.z>", id);
        let stem = out.strip_suffix(&folder_suffix(id)).unwrap();
        assert!(stem
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-'));
        assert!(!out.contains('/'));
        assert!(!out.contains('.'));
    }

    #[test]
    fn candidate_id_cannot_leave_the_folder() {
        let out = folder_name("Jane", "../../etc/x");
        assert_eq!(out, "Jane_etcx");
        assert!(!out.contains('/') && !out.contains(".."));
        assert!(out.ends_with(&folder_suffix("../../etc/x")));
    }
}
