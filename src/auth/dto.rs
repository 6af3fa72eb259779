use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Username and password must already be trimmed where relevant.
pub(crate) fn validate_credentials(username: &str, password: &str) -> Result<(), AppError> {
    let ulen = username.chars().count();
    if !(3..=64).contains(&ulen) {
        return Err(AppError::validation(
            "username must be between 3 and 64 characters",
        ));
    }
    let plen = password.chars().count();
    if !(4..=64).contains(&plen) {
        return Err(AppError::validation(
            "password must be between 4 and 64 characters",
        ));
    }
    Ok(())
}

/// Response returned after successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub username: String,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_bounds() {
        assert!(validate_credentials("bob", "pass").is_ok());
        assert!(validate_credentials("bo", "pass").is_err());
        assert!(validate_credentials(&"x".repeat(65), "pass").is_err());
        assert!(validate_credentials("bob", "abc").is_err());
        assert!(validate_credentials("bob", &"p".repeat(65)).is_err());
    }

    #[test]
    fn token_response_shape() {
        let json = serde_json::to_value(TokenResponse {
            access_token: "t".into(),
            token_type: "bearer",
            expires_in: 3600,
        })
        .unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["expires_in"], 3600);
        assert_eq!(json["access_token"], "t");
    }
}
