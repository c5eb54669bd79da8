use thiserror::Error;

use crate::schema::{FieldDescriptor, FieldKind};

/// Per-field validation failure. Displayed inline, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{label} is required.")]
    MissingRequiredValue { label: String },
    #[error("{label} must be a number.")]
    InvalidNumberFormat { label: String },
}

/// Checks one field against its stored value.
///
/// The presence check runs first: an absent or empty value is only an error
/// for required fields and is never checked further. The number check runs
/// for any present value of a number field.
pub fn validate_field(field: &FieldDescriptor, value: Option<&str>) -> Result<(), FieldError> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ if field.required => {
            return Err(FieldError::MissingRequiredValue {
                label: field.label.clone(),
            })
        }
        _ => return Ok(()),
    };

    if matches!(field.kind, FieldKind::Number) && !is_numeric(value) {
        return Err(FieldError::InvalidNumberFormat {
            label: field.label.clone(),
        });
    }

    Ok(())
}

/// True when the trimmed value parses as a finite `f64`.
///
/// Blank input, hex literals (`0x1A`) and every spelling of infinity are
/// rejected, so an accepted value always maps to a JSON number.
pub fn is_numeric(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(f64::is_finite)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn age() -> FieldDescriptor {
        FieldDescriptor::new("age", "Age", FieldKind::Number).required()
    }

    #[test]
    fn numeric_values() {
        for ok in ["9", " 9 ", "-1.5", "1e3", "0"] {
            assert!(is_numeric(ok), "{ok:?}");
        }
        for bad in [
            "", "   ", "nine", "NaN", "9 years", "inf", "+inf", "-inf", "infinity", "Infinity",
            "1e400", "0x1A",
        ] {
            assert!(!is_numeric(bad), "{bad:?}");
        }
    }

    #[test]
    fn required_check_wins_over_number_check() {
        assert_eq!(
            validate_field(&age(), None),
            Err(FieldError::MissingRequiredValue {
                label: "Age".into()
            })
        );
        assert_eq!(
            validate_field(&age(), Some("")),
            Err(FieldError::MissingRequiredValue {
                label: "Age".into()
            })
        );
    }

    #[test]
    fn number_check_applies_regardless_of_required() {
        let optional = FieldDescriptor::new("age", "Age", FieldKind::Number);
        assert_eq!(validate_field(&optional, None), Ok(()));
        assert_eq!(validate_field(&optional, Some("")), Ok(()));
        assert_eq!(
            validate_field(&optional, Some("nine")),
            Err(FieldError::InvalidNumberFormat {
                label: "Age".into()
            })
        );
        assert_eq!(
            validate_field(&age(), Some("nine")).unwrap_err().to_string(),
            "Age must be a number."
        );
        assert_eq!(validate_field(&age(), Some("9")), Ok(()));
    }

    #[test]
    fn infinite_values_are_not_numbers() {
        assert_eq!(
            validate_field(&age(), Some("inf")),
            Err(FieldError::InvalidNumberFormat {
                label: "Age".into()
            })
        );
    }

    #[test]
    fn whitespace_counts_as_present() {
        let name = FieldDescriptor::new("firstName", "First Name", FieldKind::Text).required();
        assert_eq!(validate_field(&name, Some(" ")), Ok(()));
        assert_eq!(
            validate_field(&age(), Some(" ")),
            Err(FieldError::InvalidNumberFormat {
                label: "Age".into()
            })
        );
    }

    #[test]
    fn only_number_fields_are_type_checked() {
        let password = FieldDescriptor::new("cvv", "CVV", FieldKind::Password).required();
        assert_eq!(validate_field(&password, Some("abc")), Ok(()));
        assert_eq!(
            validate_field(&password, None).unwrap_err().to_string(),
            "CVV is required."
        );
    }
}
