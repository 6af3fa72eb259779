use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Profile;
use crate::error::AppError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl ProfileUpdateRequest {
    /// Validates and normalises in place. Emails are trimmed and lowercased.
    pub fn normalize(mut self) -> Result<Self, AppError> {
        if let Some(name) = &self.full_name {
            if name.chars().count() > 128 {
                return Err(AppError::validation("full_name must be at most 128 characters"));
            }
        }
        if let Some(email) = self.email.take() {
            let email = email.trim().to_lowercase();
            if email.len() > 254 || !is_valid_email(&email) {
                return Err(AppError::validation("Invalid email"));
            }
            self.email = Some(email);
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ProfileResponse {
    pub fn new(profile: Profile, username: String) -> Self {
        Self {
            user_id: profile.user_id,
            username,
            full_name: profile.full_name,
            email: profile.email,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(full_name: Option<&str>, email: Option<&str>) -> ProfileUpdateRequest {
        ProfileUpdateRequest {
            full_name: full_name.map(Into::into),
            email: email.map(Into::into),
        }
    }

    #[test]
    fn email_is_normalized() {
        let r = req(None, Some("  Alice@Example.COM ")).normalize().unwrap();
        assert_eq!(r.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn rejects_bad_email_and_long_name() {
        assert!(req(None, Some("not-an-email")).normalize().is_err());
        assert!(req(Some(&"n".repeat(129)), None).normalize().is_err());
        assert!(req(Some(&"n".repeat(128)), None).normalize().is_ok());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(req(None, None).is_empty());
        assert!(!req(Some("A"), None).is_empty());
    }

    #[test]
    fn response_has_null_fields_for_fresh_profile() {
        let now = OffsetDateTime::now_utc();
        let profile = Profile {
            user_id: Uuid::new_v4(),
            full_name: None,
            email: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(ProfileResponse::new(profile, "alice".into())).unwrap();
        assert!(json["full_name"].is_null());
        assert!(json["email"].is_null());
        assert_eq!(json["username"], "alice");
    }
}
