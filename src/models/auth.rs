// Authentication types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ApiError;

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 20;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Headquarters staff
    Hq,
    /// Franchise store owner
    Franchise,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Hq => "HQ",
            UserRole::Franchise => "FRANCHISE",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HQ" => Ok(UserRole::Hq),
            "FRANCHISE" => Ok(UserRole::Franchise),
            other => Err(ApiError::Validation(format!("Unknown user role: {}", other))),
        }
    }
}

// ==================================================================================================
// Request Models
// ==================================================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

/// Signup form as the UI collects it
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub login_id: String,
    pub password: String,
    /// Display name; sent as `username`
    pub name: String,
    pub email: String,
    pub user_role: Option<UserRole>,
    /// Only forwarded for HQ signups
    pub admin_token: Option<String>,
}

/// Signup payload in backend vocabulary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub login_id: String,
    pub password: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
}

impl From<&SignupForm> for SignupRequest {
    fn from(form: &SignupForm) -> Self {
        let admin_token = match form.user_role {
            Some(UserRole::Hq) => form.admin_token.clone().filter(|t| !t.is_empty()),
            _ => None,
        };

        Self {
            login_id: form.login_id.clone(),
            password: form.password.clone(),
            username: form.name.clone(),
            email: form.email.clone(),
            user_role: form.user_role,
            admin_token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: String,
}

// ==================================================================================================
// Response Models
// ==================================================================================================

/// Tokens issued on login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Check a password against the backend policy: 8-20 characters mixing at
/// least two of letters, digits and special characters.
pub fn check_password_policy(password: &str) -> Result<(), ApiError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(ApiError::Validation(format!(
            "Password must be {} to {} characters long",
            PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
        )));
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && c != '_');

    let classes = [has_letter, has_digit, has_special]
        .iter()
        .filter(|present| **present)
        .count();
    if classes < 2 {
        return Err(ApiError::Validation(
            "Password must mix at least two of letters, digits and special characters"
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_signup_maps_name_to_username() {
        let form = SignupForm {
            login_id: "store01".into(),
            password: "abc12345".into(),
            name: "Kim".into(),
            email: "kim@example.com".into(),
            user_role: Some(UserRole::Franchise),
            admin_token: Some("ignored".into()),
        };
        let value = serde_json::to_value(SignupRequest::from(&form)).unwrap();
        assert_eq!(
            value,
            json!({
                "loginId": "store01",
                "password": "abc12345",
                "username": "Kim",
                "email": "kim@example.com",
                "userRole": "FRANCHISE"
            })
        );
    }

    #[test]
    fn test_signup_forwards_admin_token_for_hq() {
        let form = SignupForm {
            login_id: "hq01".into(),
            password: "abc12345".into(),
            name: "Lee".into(),
            email: "lee@example.com".into(),
            user_role: Some(UserRole::Hq),
            admin_token: Some("secret".into()),
        };
        let request = SignupRequest::from(&form);
        assert_eq!(request.admin_token.as_deref(), Some("secret"));

        let form = SignupForm {
            admin_token: Some(String::new()),
            ..form
        };
        assert_eq!(SignupRequest::from(&form).admin_token, None);
    }

    #[test]
    fn test_token_pair_wire_names() {
        let pair: TokenPair =
            serde_json::from_value(json!({"accessToken": "a", "refreshToken": "b"})).unwrap();
        assert_eq!(pair.access_token, "a");
        assert_eq!(pair.refresh_token, "b");
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!("hq".parse::<UserRole>().unwrap(), UserRole::Hq);
        assert_eq!("FRANCHISE".parse::<UserRole>().unwrap(), UserRole::Franchise);
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_password_policy_examples() {
        assert!(check_password_policy("abcd1234").is_ok());
        assert!(check_password_policy("1234!@#$").is_ok());
        assert!(check_password_policy("abcd!@#$").is_ok());
        assert!(check_password_policy("abcdefgh").is_err());
        assert!(check_password_policy("12345678").is_err());
        assert!(check_password_policy("ab1").is_err());
        assert!(check_password_policy("abcdefghij1234567890x").is_err());
    }

    proptest! {
        #[test]
        fn prop_single_class_passwords_rejected(p in "[a-zA-Z]{8,20}") {
            prop_assert!(check_password_policy(&p).is_err());
        }

        #[test]
        fn prop_letter_digit_passwords_accepted(letters in "[a-z]{4,10}", digits in "[0-9]{4,10}") {
            let password = format!("{}{}", letters, digits);
            prop_assert!(check_password_policy(&password).is_ok());
        }
    }
}
