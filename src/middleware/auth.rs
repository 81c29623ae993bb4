use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    error::{Error, Result},
    models::{candidate::Candidate, user::Role},
    utils::token::decode_token,
    AppState,
};

/// The authenticated caller, passed explicitly into every operation that
/// needs to know who is acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn require_staff(&self) -> Result<()> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(Error::Forbidden("HR or admin role required".into()))
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(Error::Forbidden("admin role required".into()))
        }
    }

    /// `Some(username)` when results must be limited to the caller's own candidates.
    pub fn requestor_scope(&self) -> Option<&str> {
        (self.role == Role::Requestor).then_some(self.username.as_str())
    }

    pub fn can_view(&self, candidate: &Candidate) -> bool {
        self.is_staff() || candidate.is_assigned_to(&self.username)
    }

    pub fn ensure_can_view(&self, candidate: &Candidate) -> Result<()> {
        if self.can_view(candidate) {
            Ok(())
        } else {
            tracing::warn!(
                username = %self.username,
                candidate_id = %candidate.candidate_id,
                "Requestor tried to open a candidate assigned to someone else"
            );
            Err(Error::Forbidden("this candidate is not assigned to you".into()))
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| Error::Unauthorized("missing_authorization".into()))?;
        let value = header
            .to_str()
            .map_err(|_| Error::Unauthorized("bad_authorization".into()))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Unauthorized("unsupported_scheme".into()))?;

        let claims = decode_token(&state.config.jwt_secret, token.trim())?;

        // Role and existence come from the store so edits apply to live tokens.
        let user = state
            .user_service
            .get(&claims.sub)
            .await?
            .ok_or_else(|| Error::Unauthorized("unknown_user".into()))?;

        Ok(Principal {
            username: user.username,
            role: user.role,
        })
    }
}
