//! Per-type value checks for schema-driven fields.
//!
//! Required-ness and type-specific constraints are dispatched on the
//! field's type tag so every type is checked through the same path.

use crate::error::Violation;
use chrono::NaiveDate;
use formflow_db::{FieldType, FormField};

/// Check one submitted value against its field definition.
///
/// Empty values are rejected only when the field is required; a present
/// value must additionally satisfy the type's own rule.
pub fn check_value(field: &FormField, value: &str) -> Result<(), Violation> {
    if value.trim().is_empty() {
        if field.is_required {
            return Err(Violation::MissingRequired {
                label: field.label.clone(),
            });
        }
        return Ok(());
    }

    match field.field_type {
        FieldType::Text | FieldType::LongText | FieldType::File => Ok(()),
        FieldType::Email => check_email(field, value),
        FieldType::Number => check_number(field, value),
        FieldType::Date => check_date(field, value),
        FieldType::Select | FieldType::Radio => check_choice(field, value.trim()),
        FieldType::Checkbox => {
            // Checkbox answers carry the selected options comma-separated.
            for token in value.split(',') {
                check_choice(field, token.trim())?;
            }
            Ok(())
        }
    }
}

fn check_email(field: &FormField, value: &str) -> Result<(), Violation> {
    let value = value.trim();
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    let ok = !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace);

    if ok {
        Ok(())
    } else {
        Err(invalid(field, format!("'{}' is not a valid email address", value)))
    }
}

fn check_number(field: &FormField, value: &str) -> Result<(), Violation> {
    let value = value.trim();
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(()),
        _ => Err(invalid(field, format!("'{}' is not a number", value))),
    }
}

fn check_date(field: &FormField, value: &str) -> Result<(), Violation> {
    let value = value.trim();
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(_) => Ok(()),
        Err(_) => Err(invalid(
            field,
            format!("'{}' is not a date (expected YYYY-MM-DD)", value),
        )),
    }
}

fn check_choice(field: &FormField, token: &str) -> Result<(), Violation> {
    let options = field.options.as_deref().unwrap_or(&[]);
    if options.iter().any(|opt| opt == token) {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("'{}' is not one of the declared options", token),
        ))
    }
}

fn invalid(field: &FormField, reason: String) -> Violation {
    Violation::InvalidValue {
        label: field.label.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn field(field_type: FieldType, required: bool, options: Option<Vec<&str>>) -> FormField {
        let now = Utc::now();
        FormField {
            id: 1,
            form_id: 1,
            label: "Answer".into(),
            field_name: "answer".into(),
            field_type,
            is_required: required,
            placeholder: None,
            help_text: None,
            options: options.map(|opts| opts.into_iter().map(String::from).collect()),
            order_number: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn required_rejects_whitespace() {
        let f = field(FieldType::Text, true, None);
        assert!(matches!(
            check_value(&f, "   "),
            Err(Violation::MissingRequired { .. })
        ));
        assert!(check_value(&f, "hello").is_ok());
    }

    #[test]
    fn optional_empty_skips_type_check() {
        let f = field(FieldType::Number, false, None);
        assert!(check_value(&f, "").is_ok());
        assert!(check_value(&f, "abc").is_err());
    }

    #[test]
    fn email_shape() {
        let f = field(FieldType::Email, true, None);
        assert!(check_value(&f, "alice@example.com").is_ok());
        assert!(check_value(&f, "no-at-sign").is_err());
        assert!(check_value(&f, "a@b").is_err());
        assert!(check_value(&f, "a b@example.com").is_err());
    }

    #[test]
    fn number_parses() {
        let f = field(FieldType::Number, true, None);
        assert!(check_value(&f, "30").is_ok());
        assert!(check_value(&f, "-2.5").is_ok());
        assert!(check_value(&f, "thirty").is_err());
    }

    #[test]
    fn date_is_iso() {
        let f = field(FieldType::Date, true, None);
        assert!(check_value(&f, "2026-08-27").is_ok());
        assert!(check_value(&f, "27/08/2026").is_err());
        assert!(check_value(&f, "2026-13-01").is_err());
    }

    #[test]
    fn choice_membership() {
        let f = field(FieldType::Select, true, Some(vec!["red", "green"]));
        assert!(check_value(&f, "red").is_ok());
        assert!(check_value(&f, "blue").is_err());
    }

    #[test]
    fn checkbox_checks_every_token() {
        let f = field(FieldType::Checkbox, true, Some(vec!["a", "b", "c"]));
        assert!(check_value(&f, "a, c").is_ok());
        assert!(check_value(&f, "a, d").is_err());
    }
}
