//! Non-interactive front end: select, set and submit driven by arguments.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::{
    components::form::SUCCESS_MESSAGE,
    engine::{EngineError, FormEngine, Progress, SubmitOutcome},
    schema::SchemaRegistry,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrorReport {
    pub field: String,
    pub message: String,
}

/// Outcome of one headless submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitReport {
    pub form_type: String,
    pub accepted: bool,
    pub progress: Option<Progress>,
    /// Validation errors in schema order.
    pub errors: Vec<FieldErrorReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<JsonMap<String, JsonValue>>,
}

/// Run select → set → submit on a fresh engine.
pub fn submit(
    engine: &mut FormEngine,
    form_type: &str,
    assignments: &[(String, String)],
) -> Result<SubmitReport, EngineError> {
    engine.select_form_type(form_type);
    for (name, value) in assignments {
        engine.set_field_value(name, value.clone())?;
    }

    let outcome = engine.submit();
    let errors = engine
        .error_entries()
        .into_iter()
        .map(|(field, err)| FieldErrorReport {
            field: field.name.clone(),
            message: err.to_string(),
        })
        .collect();

    let (accepted, values) = match outcome {
        SubmitOutcome::Accepted(submission) => (true, Some(submission.values)),
        SubmitOutcome::Rejected { .. } | SubmitOutcome::NoFields => (false, None),
    };

    Ok(SubmitReport {
        form_type: form_type.to_string(),
        accepted,
        progress: engine.progress(),
        errors,
        values,
    })
}

pub fn render_report(report: &SubmitReport) -> String {
    let mut out = String::new();
    let progress = report
        .progress
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "Form type: {}", report.form_type);
    let _ = writeln!(out, "Progress:  {progress}");

    if report.accepted {
        let _ = writeln!(out, "{SUCCESS_MESSAGE}");
        if let Some(values) = &report.values {
            for (name, value) in values {
                let _ = writeln!(out, "  {name} = {value}");
            }
        }
    } else {
        let _ = writeln!(out, "Errors:");
        for err in &report.errors {
            let _ = writeln!(out, "  - {}: {}", err.field, err.message);
        }
    }
    out
}

/// Human readable listing of every form type and its fields.
pub fn render_listing(registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    for form_type in registry.form_types() {
        let _ = writeln!(out, "{} ({})", form_type.label, form_type.id);
        for field in &form_type.fields {
            let required = if field.required { " *" } else { "" };
            let _ = write!(out, "  {:<16} {:<10} {}{}", field.name, field.kind, field.label, required);
            let options = field.kind.options();
            if !options.is_empty() {
                let _ = write!(out, " [{}]", options.join(", "));
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn set(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn rejected_report_lists_errors_in_schema_order() {
        let mut engine = FormEngine::default();
        let report = submit(&mut engine, "userInfo", &set(&[("firstName", "Ann")])).unwrap();

        assert!(!report.accepted);
        assert_eq!(report.progress.map(Progress::percent), Some(33));
        assert_eq!(
            report.errors,
            vec![
                FieldErrorReport {
                    field: "lastName".into(),
                    message: "Last Name is required.".into()
                },
                FieldErrorReport {
                    field: "age".into(),
                    message: "Age is required.".into()
                },
            ]
        );
        let text = render_report(&report);
        assert!(text.contains("Progress:  33%"));
        assert!(text.contains("  - age: Age is required."));
    }

    #[test]
    fn accepted_report_carries_values() {
        let mut engine = FormEngine::default();
        let report = submit(
            &mut engine,
            "addressInfo",
            &set(&[
                ("street", "1 Main St"),
                ("city", "Austin"),
                ("state", "Texas"),
                ("zipCode", "73301"),
            ]),
        )
        .unwrap();

        assert!(report.accepted);
        assert!(report.errors.is_empty());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "form_type": "addressInfo",
                "accepted": true,
                "progress": 100,
                "errors": [],
                "values": {
                    "street": "1 Main St",
                    "city": "Austin",
                    "state": "Texas",
                    "zipCode": "73301",
                },
            })
        );
        assert!(render_report(&report).contains(SUCCESS_MESSAGE));
    }

    #[test]
    fn unknown_field_fails() {
        let mut engine = FormEngine::default();
        let err = submit(&mut engine, "userInfo", &set(&[("cvv", "123")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown field `cvv` for form type `userInfo`"
        );
    }

    #[test]
    fn listing_shows_every_form_type() {
        let text = render_listing(&SchemaRegistry::builtin());
        assert!(text.contains("User Information (userInfo)"));
        assert!(text.contains("[California, Texas, New York]"));
        assert!(text.contains("password"));
    }
}
