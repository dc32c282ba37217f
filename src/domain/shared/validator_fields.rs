// src/domain/shared/validator_fields.rs
//
// Bridge between declarative `validator` rule sets and the Notification
// accumulator. Rules never raise; every violation becomes a field message.

use validator::{Validate, ValidationError};

use super::notification::Notification;

/// Per-aggregate field validator
pub trait ValidatorFields<T> {
    /// Groups validated when the caller does not name any
    fn default_fields(&self) -> &'static [&'static str];

    /// Validate `fields` (or the default list) of `data`, recording every
    /// violation. Returns `true` iff this call added no errors.
    fn validate(&self, notification: &mut Notification, data: &T, fields: Option<&[&str]>) -> bool;
}

/// Run a derived rule set and record violations of the requested fields, in
/// the order the fields were requested
pub fn validate_rules<R: Validate>(
    notification: &mut Notification,
    rules: &R,
    fields: &[&str],
) -> bool {
    let errors = match rules.validate() {
        Ok(()) => return true,
        Err(errors) => errors,
    };

    let field_errors = errors.field_errors();
    let mut added = false;
    for field in fields {
        if let Some(violations) = field_errors.get(*field) {
            for violation in violations.iter() {
                notification.add_error(describe(field, violation), Some(field));
                added = true;
            }
        }
    }

    !added
}

/// Human-readable message for a rule violation
fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let number = |key: &str| error.params.get(key).and_then(|v| v.as_f64());

    match error.code.as_ref() {
        "length" => {
            let length = error
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map(|s| s.chars().count() as f64);
            match (length, number("min"), number("max")) {
                (Some(len), Some(min), _) if len < min && min <= 1.0 => {
                    format!("{field} should not be empty")
                }
                (Some(len), Some(min), _) if len < min => {
                    format!("{field} must be longer than or equal to {min} characters")
                }
                (_, _, Some(max)) => {
                    format!("{field} must be shorter than or equal to {max} characters")
                }
                _ => format!("{field} has an invalid length"),
            }
        }
        "range" => match (number("min"), number("max")) {
            (Some(min), Some(max)) => format!("{field} must be between {min} and {max}"),
            (Some(min), None) => format!("{field} must not be less than {min}"),
            (None, Some(max)) => format!("{field} must not be greater than {max}"),
            (None, None) => format!("{field} is out of range"),
        },
        code => format!("{field} is invalid ({code})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Rules {
        #[validate(length(min = 1, max = 5))]
        name: String,
        #[validate(range(min = 1))]
        amount: i64,
    }

    #[test]
    fn test_valid_rules_add_nothing() {
        let mut notification = Notification::new();
        let rules = Rules { name: "ok".into(), amount: 3 };
        assert!(validate_rules(&mut notification, &rules, &["name", "amount"]));
        assert!(!notification.has_errors());
    }

    #[test]
    fn test_all_violations_accumulate_in_one_pass() {
        let mut notification = Notification::new();
        let rules = Rules { name: "too long name".into(), amount: 0 };
        assert!(!validate_rules(&mut notification, &rules, &["name", "amount"]));

        assert_eq!(
            notification.errors_for("name").unwrap(),
            &["name must be shorter than or equal to 5 characters".to_string()]
        );
        assert_eq!(
            notification.errors_for("amount").unwrap(),
            &["amount must not be less than 1".to_string()]
        );
    }

    #[test]
    fn test_only_requested_fields_are_recorded() {
        let mut notification = Notification::new();
        let rules = Rules { name: "".into(), amount: 0 };
        validate_rules(&mut notification, &rules, &["amount"]);
        assert!(notification.errors_for("name").is_none());
        assert!(notification.errors_for("amount").is_some());
    }

    #[test]
    fn test_empty_text_is_reported_under_its_field() {
        let mut notification = Notification::new();
        let rules = Rules { name: "".into(), amount: 1 };
        validate_rules(&mut notification, &rules, &["name"]);
        assert_eq!(notification.errors_for("name").map(|m| m.len()), Some(1));
    }
}
