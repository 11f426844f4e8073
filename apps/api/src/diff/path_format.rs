//! Path formatter: turns a change path into a label a person can read,
//! e.g. `["sections", "experience", items[1], "position"]` → `Experience › Entry 2 › Position`.

use serde::Serialize;

use crate::diff::differ::{ChangeRecord, PathSegment};

pub const SEPARATOR: &str = " › ";

/// Grouping key that wraps every section; never shown.
const SECTIONS_KEY: &str = "sections";
/// Body of a scalar section; the section name alone describes it.
const CONTENT_KEY: &str = "content";
/// Shown when the whole document changed.
const ROOT_LABEL: &str = "Resume";
/// Base label for array elements whose array had no key (root or nested arrays).
const UNKEYED_ELEMENT_LABEL: &str = "Item";

const LABELS: &[(&str, &str)] = &[
    ("basics", "Basics"),
    ("sections", "Sections"),
    ("name", "Name"),
    ("headline", "Headline"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("location", "Location"),
    ("url", "Website"),
    ("href", "Link"),
    ("label", "Label"),
    ("picture", "Photo"),
    ("summary", "Summary"),
    ("experience", "Experience"),
    ("education", "Education"),
    ("projects", "Projects"),
    ("skills", "Skills"),
    ("languages", "Languages"),
    ("awards", "Awards"),
    ("certifications", "Certifications"),
    ("interests", "Interests"),
    ("publications", "Publications"),
    ("volunteer", "Volunteering"),
    ("references", "References"),
    ("profiles", "Profiles"),
    ("custom", "Custom Sections"),
    ("items", "Entry"),
    ("company", "Company"),
    ("position", "Position"),
    ("institution", "Institution"),
    ("area", "Field of Study"),
    ("studyType", "Degree"),
    ("score", "Grade"),
    ("date", "Date"),
    ("description", "Description"),
    ("keywords", "Keywords"),
    ("level", "Level"),
    ("visible", "Visibility"),
    ("network", "Network"),
    ("username", "Username"),
    ("issuer", "Issuer"),
    ("awarder", "Awarder"),
    ("publisher", "Publisher"),
    ("organization", "Organization"),
];

/// A change record with its rendered label, as shipped to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledChange {
    pub path: Vec<PathSegment>,
    pub label: String,
    pub before: String,
    pub after: String,
}

pub fn format_path(path: &[PathSegment]) -> String {
    match path {
        [] => return ROOT_LABEL.to_string(),
        [PathSegment::Key(only)] if only == SECTIONS_KEY => return label_for(only),
        _ => {}
    }

    let mut segments = path;
    if let Some(PathSegment::Key(first)) = segments.first() {
        if first == SECTIONS_KEY {
            segments = &segments[1..];
        }
    }
    if segments.len() > 1 {
        if let Some(PathSegment::Key(last)) = segments.last() {
            if last == CONTENT_KEY {
                segments = &segments[..segments.len() - 1];
            }
        }
    }

    segments
        .iter()
        .map(|segment| match segment {
            PathSegment::Key(key) => label_for(key),
            PathSegment::Index { key, index } => {
                let base = if key.is_empty() {
                    UNKEYED_ELEMENT_LABEL.to_string()
                } else {
                    label_for(key)
                };
                format!("{base} {}", index + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

pub fn label_changes(changes: &[ChangeRecord]) -> Vec<LabeledChange> {
    changes
        .iter()
        .map(|c| LabeledChange {
            path: c.path.clone(),
            label: format_path(&c.path),
            before: c.before.clone(),
            after: c.after.clone(),
        })
        .collect()
}

fn label_for(key: &str) -> String {
    LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| start_case(key))
}

/// `startDate` / `start_date` / `start-date` → `Start Date`.
pub fn start_case(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if c == '_' || c == '-' {
            spaced.push(' ');
        } else {
            if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                spaced.push(' ');
            }
            spaced.push(c);
        }
        prev = Some(c);
    }

    spaced
        .split_whitespace()
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().to_string() + c.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
