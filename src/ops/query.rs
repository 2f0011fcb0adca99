use crate::model::record::TaskRecord;
use crate::model::task::Task;
use crate::ops::filter::FilterSpec;
use crate::ops::sort::{self, SortDirection, SortKey};

/// Error type for caller-contract violations. Data-quality problems in
/// the records themselves never raise; they degrade field by field.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("unknown sort direction: {0} (expected asc or desc)")]
    UnknownSortDirection(String),
    #[error("unknown display mode: {0} (expected project_tree, task_tree, or flat)")]
    UnknownDisplayMode(String),
    #[error("failed to parse task records: {0}")]
    InvalidRecords(#[from] serde_json::Error),
}

/// Decode a JSON array of task records, as produced by the external
/// record-fetch collaborator.
pub fn parse_records(json: &str) -> Result<Vec<TaskRecord>, QueryError> {
    Ok(serde_json::from_str(json)?)
}

/// Normalize raw records in input order.
pub fn normalize_records(records: &[TaskRecord]) -> Vec<Task> {
    records
        .iter()
        .enumerate()
        .map(|(order, record)| Task::from_record(record, order))
        .collect()
}

/// The flat query pipeline: normalize, filter, stable-sort, truncate.
/// A `limit` of 0 means unlimited.
pub fn filter_and_sort(
    records: &[TaskRecord],
    spec: &FilterSpec,
    key: SortKey,
    direction: SortDirection,
    limit: usize,
) -> Vec<Task> {
    let tasks = normalize_records(records);
    let mut matched = spec.apply(&tasks);
    sort::sort_tasks(&mut matched, key, direction);
    if limit > 0 && matched.len() > limit {
        matched.truncate(limit);
    }
    matched
}
