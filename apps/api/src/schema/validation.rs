//! Resume schema validation.
//!
//! The workflow only needs a yes/no answer plus messages, so it depends on the
//! [`SchemaValidator`] trait. `ResumeSchemaValidator` is the default backend,
//! checking the structural contract the browser editor relies on.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::ResumeDocument;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Pass/fail oracle for candidate documents. Carried as `Arc<dyn SchemaValidator>`.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, candidate: &ResumeDocument) -> ValidationReport;
}

/// Item fields that must be strings when present, per well-known section key.
const STRING_FIELDS: &[(&str, &[&str])] = &[
    ("experience", &["company", "position", "date", "location", "summary"]),
    ("education", &["institution", "area", "studyType", "date", "score"]),
    ("projects", &["name", "description", "date"]),
    ("skills", &["name", "level"]),
];

pub struct ResumeSchemaValidator;

impl SchemaValidator for ResumeSchemaValidator {
    fn validate(&self, candidate: &ResumeDocument) -> ValidationReport {
        ValidationReport::from_errors(collect_errors(candidate.as_value()))
    }
}

fn collect_errors(root: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = root.as_object() else {
        errors.push("Resume must be a JSON object.".to_string());
        return errors;
    };

    match root.get("basics") {
        Some(Value::Object(basics)) => check_basics(basics, &mut errors),
        _ => errors.push("basics is required.".to_string()),
    }

    match root.get("sections") {
        Some(Value::Object(sections)) => {
            for (key, section) in sections {
                check_section(key, section, &mut errors);
            }
        }
        _ => errors.push("sections is required.".to_string()),
    }

    errors
}

fn check_basics(basics: &Map<String, Value>, errors: &mut Vec<String>) {
    match basics.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        _ => errors.push("basics.name is required.".to_string()),
    }

    for (key, value) in basics {
        if key == "name" {
            continue;
        }
        if !matches!(value, Value::String(_) | Value::Null | Value::Object(_)) {
            errors.push(format!("basics.{key} must be a string."));
        }
    }
}

fn check_section(key: &str, section: &Value, errors: &mut Vec<String>) {
    let prefix = format!("sections.{key}");
    let Some(section) = section.as_object() else {
        errors.push(format!("{prefix} must be an object."));
        return;
    };

    require_string(section, "id", &prefix, errors);
    require_string(section, "name", &prefix, errors);
    require_bool(section, "visible", &prefix, errors);

    if let Some(content) = section.get("content") {
        if !content.is_string() {
            errors.push(format!("{prefix}.content must be a string."));
        }
    }

    match section.get("items") {
        None => {}
        Some(Value::Array(items)) => {
            let string_fields = STRING_FIELDS
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, fields)| *fields)
                .unwrap_or(&[]);
            for (index, item) in items.iter().enumerate() {
                check_item(&format!("{prefix}.items[{index}]"), item, string_fields, errors);
            }
        }
        Some(_) => errors.push(format!("{prefix}.items must be an array.")),
    }
}

fn check_item(prefix: &str, item: &Value, string_fields: &[&str], errors: &mut Vec<String>) {
    let Some(item) = item.as_object() else {
        errors.push(format!("{prefix} must be an object."));
        return;
    };

    require_string(item, "id", prefix, errors);
    require_bool(item, "visible", prefix, errors);

    for field in string_fields {
        if let Some(value) = item.get(*field) {
            if !value.is_string() {
                errors.push(format!("{prefix}.{field} must be a string."));
            }
        }
    }

    if let Some(keywords) = item.get("keywords") {
        let ok = keywords
            .as_array()
            .is_some_and(|k| k.iter().all(Value::is_string));
        if !ok {
            errors.push(format!("{prefix}.keywords must be a list of strings."));
        }
    }
}

fn require_string(obj: &Map<String, Value>, field: &str, prefix: &str, errors: &mut Vec<String>) {
    match obj.get(field) {
        Some(Value::String(_)) => {}
        None => errors.push(format!("{prefix}.{field} is required.")),
        Some(_) => errors.push(format!("{prefix}.{field} must be a string.")),
    }
}

fn require_bool(obj: &Map<String, Value>, field: &str, prefix: &str, errors: &mut Vec<String>) {
    match obj.get(field) {
        Some(Value::Bool(_)) => {}
        None => errors.push(format!("{prefix}.{field} is required.")),
        Some(_) => errors.push(format!("{prefix}.{field} must be a boolean.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(value: Value) -> ValidationReport {
        ResumeSchemaValidator.validate(&ResumeDocument::new(value))
    }

    fn valid_resume() -> Value {
        json!({
            "basics": {"name": "Ada", "email": "ada@example.com", "url": {"label": "", "href": ""}, "picture": null},
            "sections": {
                "summary": {"id": "summary", "name": "Summary", "visible": true, "content": "Engineer."},
                "experience": {"id": "experience", "name": "Experience", "visible": true, "items": [
                    {"id": "e1", "visible": true, "company": "Acme", "position": "Engineer", "keywords": ["rust"]}
                ]},
                "hobbies": {"id": "hobbies", "name": "Hobbies", "visible": false, "items": [
                    {"id": "h1", "visible": true, "name": 3}
                ]}
            }
        })
    }

    #[test]
    fn test_valid_resume_passes() {
        let report = validate(valid_resume());
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_name_is_reported() {
        let mut resume = valid_resume();
        resume["basics"]["name"] = json!("  ");
        let report = validate(resume);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["basics.name is required.".to_string()]);
    }

    #[test]
    fn test_item_field_type_is_reported_with_index() {
        let mut resume = valid_resume();
        resume["sections"]["experience"]["items"][0]["position"] = json!(42);
        let report = validate(resume);
        assert_eq!(
            report.errors,
            vec!["sections.experience.items[0].position must be a string.".to_string()]
        );
    }

    #[test]
    fn test_section_envelope_is_checked() {
        let mut resume = valid_resume();
        resume["sections"]["summary"] = json!({"name": "Summary", "visible": "yes", "content": 1});
        let report = validate(resume);
        assert_eq!(
            report.errors,
            vec![
                "sections.summary.id is required.".to_string(),
                "sections.summary.visible must be a boolean.".to_string(),
                "sections.summary.content must be a string.".to_string(),
            ]
        );
    }

    #[test]
    fn test_non_object_root_and_missing_members() {
        assert_eq!(
            validate(json!([])).errors,
            vec!["Resume must be a JSON object.".to_string()]
        );
        assert_eq!(
            validate(json!({})).errors,
            vec!["basics is required.".to_string(), "sections is required.".to_string()]
        );
    }

    #[test]
    fn test_items_must_be_objects_with_keywords_as_strings() {
        let mut resume = valid_resume();
        resume["sections"]["experience"]["items"] = json!([
            "plain",
            {"id": "e2", "visible": true, "keywords": ["a", 1]}
        ]);
        let report = validate(resume);
        assert_eq!(
            report.errors,
            vec![
                "sections.experience.items[0] must be an object.".to_string(),
                "sections.experience.items[1].keywords must be a list of strings.".to_string(),
            ]
        );
    }

    #[test]
    fn test_basics_scalars_must_be_strings() {
        let mut resume = valid_resume();
        resume["basics"]["phone"] = json!(5551234);
        let report = validate(resume);
        assert_eq!(report.errors, vec!["basics.phone must be a string.".to_string()]);
    }
}
