//! Parsing of resume JSON pasted or uploaded by the user.
//!
//! Input errors are caught here, before any model call is made.

use crate::llm_client::strip_json_fences;
use crate::models::ResumeDocument;
use crate::schema::validation::SchemaValidator;

/// Parses `text` as a resume and validates it.
/// Returns field-qualified messages on failure; nothing is sent upstream.
pub fn parse_resume_input(
    text: &str,
    validator: &dyn SchemaValidator,
) -> Result<ResumeDocument, Vec<String>> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(vec!["Paste your resume JSON to continue.".to_string()]);
    }

    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| vec![format!("Resume JSON is malformed: {e}.")])?;

    let document = ResumeDocument::new(value);
    let report = validator.validate(&document);
    if !report.is_valid {
        return Err(report.errors);
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validation::ResumeSchemaValidator;

    const VALID: &str = r#"{
        "basics": {"name": "Ada"},
        "sections": {"summary": {"id": "s", "name": "Summary", "visible": true, "content": "Hi"}}
    }"#;

    #[test]
    fn test_valid_json_is_accepted() {
        let doc = parse_resume_input(VALID, &ResumeSchemaValidator).unwrap();
        assert_eq!(doc.name(), Some("Ada"));
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let fenced = format!("```json\n{VALID}\n```");
        assert!(parse_resume_input(&fenced, &ResumeSchemaValidator).is_ok());
    }

    #[test]
    fn test_malformed_json_reports_position() {
        let errors = parse_resume_input("{\"basics\": ", &ResumeSchemaValidator).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Resume JSON is malformed"));
        assert!(errors[0].contains("line 1"));
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let errors = parse_resume_input("   \n", &ResumeSchemaValidator).unwrap_err();
        assert_eq!(errors, vec!["Paste your resume JSON to continue.".to_string()]);
    }

    #[test]
    fn test_schema_errors_are_passed_through() {
        let errors = parse_resume_input(r#"{"basics": {}, "sections": {}}"#, &ResumeSchemaValidator)
            .unwrap_err();
        assert_eq!(errors, vec!["basics.name is required.".to_string()]);
    }
}
