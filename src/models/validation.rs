use serde::Serialize;
use serde_json::Value;

/// Outcome of validating a payload: every failed rule adds one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Validation {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Absent, null, empty string, zero and false all count as "not provided"
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Check a required string field: presence, then type, then `shape`
///
/// Returns the string when every rule passed.
pub fn check_string<'a>(
    value: Option<&'a Value>,
    errors: &mut Vec<String>,
    required: &str,
    not_a_string: &str,
    shape: impl FnOnce(&str) -> Option<String>,
) -> Option<&'a str> {
    if is_missing(value) {
        errors.push(required.to_string());
        return None;
    }

    let Some(text) = value.and_then(Value::as_str) else {
        errors.push(not_a_string.to_string());
        return None;
    };

    match shape(text) {
        Some(message) => {
            errors.push(message);
            None
        }
        None => Some(text),
    }
}

/// Length in characters, not bytes
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_missing_follows_truthiness() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&json!(null))));
        assert!(is_missing(Some(&json!(""))));
        assert!(is_missing(Some(&json!(0))));
        assert!(is_missing(Some(&json!(false))));

        assert!(!is_missing(Some(&json!("a"))));
        assert!(!is_missing(Some(&json!(3))));
        assert!(!is_missing(Some(&json!([]))));
    }

    #[test]
    fn test_check_string_short_circuits_per_field() {
        let mut errors = Vec::new();
        let value = json!(42);

        let result = check_string(Some(&value), &mut errors, "required", "string", |_| {
            Some("shape".to_string())
        });

        assert!(result.is_none());
        assert_eq!(errors, vec!["string".to_string()]);
    }

    #[test]
    fn test_validation_from_errors() {
        assert!(Validation::from_errors(vec![]).is_valid);

        let invalid = Validation::from_errors(vec!["bad".to_string()]);
        assert!(!invalid.is_valid);
        assert_eq!(invalid.errors, vec!["bad".to_string()]);
    }
}
