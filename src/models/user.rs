use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

use crate::constants::{
    ERR_CREDENTIALS_REQUIRED, PASSWORD_MIN_LEN, PSEUDO_MAX_LEN, PSEUDO_MIN_LEN,
};
use crate::error::{AppError, Result};
use crate::models::validation::{char_len, check_string, Validation};

/// User row as stored in the USER table, password hash included
///
/// Not `Serialize`: convert into [`User`] before it leaves
/// the service layer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    #[sqlx(rename = "ID_User")]
    pub id: i64,
    #[sqlx(rename = "Pseudo")]
    pub pseudo: String,
    #[sqlx(rename = "Email")]
    pub email: String,
    #[sqlx(rename = "Password")]
    pub password_hash: String,
}

/// User model for API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID_User")]
    pub id: i64,
    #[serde(rename = "Pseudo")]
    pub pseudo: String,
    #[serde(rename = "Email")]
    pub email: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            pseudo: record.pseudo,
            email: record.email,
        }
    }
}

/// Registration / user update body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(rename = "Pseudo")]
    pub pseudo: Option<Value>,
    #[serde(rename = "Email")]
    pub email: Option<Value>,
    #[serde(rename = "Password")]
    pub password: Option<Value>,
}

/// A validated user; `password` is still plain text at this point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub pseudo: String,
    pub email: String,
    pub password: String,
}

/// Login body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    pub email: Option<Value>,
    pub password: Option<Value>,
}

/// Loose email shape: `local@domain.tld`, no whitespace, exactly one `@`
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern for email")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

fn check_payload(payload: &UserPayload, errors: &mut Vec<String>) -> Option<NewUser> {
    let pseudo = check_string(
        payload.pseudo.as_ref(),
        errors,
        "Pseudo is required",
        "Pseudo must be a string",
        |pseudo| match char_len(pseudo) {
            len if len < PSEUDO_MIN_LEN => Some(format!(
                "Pseudo must be at least {} characters long",
                PSEUDO_MIN_LEN
            )),
            len if len > PSEUDO_MAX_LEN => Some(format!(
                "Pseudo cannot exceed {} characters",
                PSEUDO_MAX_LEN
            )),
            _ => None,
        },
    );

    let email = check_string(
        payload.email.as_ref(),
        errors,
        "Email is required",
        "Email must be a string",
        |email| (!is_valid_email(email)).then(|| "Email must be valid".to_string()),
    );

    let password = check_string(
        payload.password.as_ref(),
        errors,
        "Password is required",
        "Password must be a string",
        |password| {
            (char_len(password) < PASSWORD_MIN_LEN).then(|| {
                format!(
                    "Password must be at least {} characters long",
                    PASSWORD_MIN_LEN
                )
            })
        },
    );

    Some(NewUser {
        pseudo: pseudo?.to_string(),
        email: email?.to_string(),
        password: password?.to_string(),
    })
}

/// Validate a user payload without side effects
pub fn validate_user(payload: &UserPayload) -> Validation {
    let mut errors = Vec::new();
    check_payload(payload, &mut errors);
    Validation::from_errors(errors)
}

impl UserPayload {
    pub fn into_new_user(self) -> Result<NewUser> {
        let mut errors = Vec::new();
        match check_payload(&self, &mut errors) {
            Some(user) => Ok(user),
            None => Err(AppError::Validation(errors)),
        }
    }
}

impl LoginPayload {
    /// Both fields must be present non-empty strings
    pub fn into_credentials(self) -> Result<(String, String)> {
        match (&self.email, &self.password) {
            (Some(Value::String(email)), Some(Value::String(password)))
                if !email.is_empty() && !password.is_empty() =>
            {
                Ok((email.clone(), password.clone()))
            }
            _ => Err(AppError::invalid(ERR_CREDENTIALS_REQUIRED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> UserPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_user() {
        let result = validate_user(&payload(json!({
            "Pseudo": "Steve",
            "Email": "steve@minecraft.com",
            "Password": "password123"
        })));

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("steve@minecraft.com"));
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.org"));

        assert!(!is_valid_email("steve"));
        assert!(!is_valid_email("steve@minecraft"));
        assert!(!is_valid_email("@minecraft.com"));
        assert!(!is_valid_email("steve@.com"));
        assert!(!is_valid_email("steve@minecraft."));
        assert!(!is_valid_email("st eve@minecraft.com"));
        assert!(!is_valid_email("steve@mine@craft.com"));
    }

    #[test]
    fn test_pseudo_bounds() {
        let short = validate_user(&payload(json!({
            "Pseudo": "St",
            "Email": "steve@minecraft.com",
            "Password": "password123"
        })));
        assert_eq!(short.errors, vec!["Pseudo must be at least 3 characters long"]);

        let long = validate_user(&payload(json!({
            "Pseudo": "S".repeat(31),
            "Email": "steve@minecraft.com",
            "Password": "password123"
        })));
        assert_eq!(long.errors, vec!["Pseudo cannot exceed 30 characters"]);
    }

    #[test]
    fn test_every_field_reports_independently() {
        let result = validate_user(&payload(json!({
            "Email": "not-an-email",
            "Password": "123"
        })));

        assert_eq!(
            result.errors,
            vec![
                "Pseudo is required",
                "Email must be valid",
                "Password must be at least 6 characters long"
            ]
        );
    }

    #[test]
    fn test_user_record_conversion_drops_password() {
        let record = UserRecord {
            id: 7,
            pseudo: "Alex".to_string(),
            email: "alex@minecraft.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
        };

        let user = User::from(record);
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["ID_User"], 7);
        assert!(json.get("Password").is_none());
    }

    #[test]
    fn test_login_payload_requires_both_fields() {
        let missing: LoginPayload = serde_json::from_value(json!({ "email": "a@b.co" })).unwrap();
        assert!(matches!(
            missing.into_credentials(),
            Err(AppError::Validation(_))
        ));

        let ok: LoginPayload =
            serde_json::from_value(json!({ "email": "a@b.co", "password": "secret" })).unwrap();
        assert_eq!(
            ok.into_credentials().unwrap(),
            ("a@b.co".to_string(), "secret".to_string())
        );
    }
}
