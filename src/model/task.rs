use serde::Serialize;

use crate::model::record::TaskRecord;

/// A fully-normalized task. Built from a [`TaskRecord`] once per query;
/// every loosely-typed input field has been defaulted or dropped here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Note text; empty string when the record had none.
    pub note: String,
    pub completed: bool,
    pub dropped: bool,
    pub flagged: bool,
    pub due_date: Option<String>,
    pub defer_date: Option<String>,
    pub planned_date: Option<String>,
    pub completion_date: Option<String>,
    pub creation_date: Option<String>,
    /// Estimated duration in minutes; kept only for genuine numbers.
    pub estimated_minutes: Option<f64>,
    pub project_name: Option<String>,
    /// The declared parent identifier (not yet resolved against a build).
    pub parent_id: Option<String>,
    pub in_inbox: bool,
    /// Deduplicated, trimmed tag names in first-seen order.
    pub tags: Vec<String>,
    /// Position in the input fetch; the sibling-ordering tie-break.
    #[serde(skip)]
    pub order: usize,
}

impl Task {
    /// Normalize a raw record. Malformed fields have already degraded to
    /// defaults during deserialization; this step owns default
    /// substitution and tag/project cleanup.
    pub fn from_record(record: &TaskRecord, order: usize) -> Task {
        Task {
            id: record.id.clone(),
            name: record.name.clone(),
            note: record.note.clone().unwrap_or_default(),
            completed: record.completed,
            dropped: record.dropped,
            flagged: record.flagged,
            due_date: clean_date(&record.due_date),
            defer_date: clean_date(&record.defer_date),
            planned_date: clean_date(&record.planned_date),
            completion_date: clean_date(&record.completion_date),
            creation_date: clean_date(&record.creation_date),
            estimated_minutes: record.estimated_minutes,
            project_name: resolve_project_name(record),
            parent_id: record.parent_id().map(str::to_string),
            in_inbox: record.in_inbox,
            tags: normalize_tags(record),
            order,
        }
    }

    /// Tag names in display form (`#tag`).
    pub fn display_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|tag| {
                if tag.starts_with('#') {
                    tag.clone()
                } else {
                    format!("#{tag}")
                }
            })
            .collect()
    }

    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }

    /// Whether this task belongs to the inbox: either the source flagged
    /// it as such, or it has no resolved project.
    pub fn is_inbox(&self) -> bool {
        self.in_inbox || self.project_name.is_none()
    }
}

/// First non-empty trimmed value of `projectName`/`project`, else None.
fn resolve_project_name(record: &TaskRecord) -> Option<String> {
    for value in [&record.project_name, &record.project] {
        if let Some(name) = value {
            let name = name.trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// Trimmed, non-empty, deduplicated tag names. Entries without a usable
/// name are dropped silently.
fn normalize_tags(record: &TaskRecord) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for entry in &record.tags {
        if let Some(name) = entry.name() {
            let name = name.trim();
            if !name.is_empty() && !tags.iter().any(|t| t == name) {
                tags.push(name.to_string());
            }
        }
    }
    tags
}

/// Drop blank date strings so downstream code only sees real values.
fn clean_date(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
