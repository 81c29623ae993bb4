use validator::ValidationError;

use crate::models::status::CandidateStatus;

pub fn known_status(value: &str) -> Result<(), ValidationError> {
    if CandidateStatus::parse_known(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("unknown_status");
        err.message = Some(format!("Unknown status: {}", value).into());
        Err(err)
    }
}

pub fn ymd_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || crate::utils::time::is_ymd(value) {
        Ok(())
    } else {
        Err(ValidationError::new("date_format"))
    }
}
