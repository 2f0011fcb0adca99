use std::cmp::Ordering;
use std::str::FromStr;

use crate::model::task::Task;
use crate::ops::query::QueryError;
use crate::util::dates;

/// Sort key for flat task queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    DueDate,
    DeferDate,
    PlannedDate,
    CompletedDate,
    Flagged,
    Project,
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<SortKey, QueryError> {
        match s {
            "name" => Ok(SortKey::Name),
            "dueDate" | "due_date" => Ok(SortKey::DueDate),
            "deferDate" | "defer_date" => Ok(SortKey::DeferDate),
            "plannedDate" | "planned_date" => Ok(SortKey::PlannedDate),
            "completedDate" | "completed_date" => Ok(SortKey::CompletedDate),
            "flagged" => Ok(SortKey::Flagged),
            "project" => Ok(SortKey::Project),
            _ => Err(QueryError::UnknownSortKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<SortDirection, QueryError> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(QueryError::UnknownSortDirection(s.to_string())),
        }
    }
}

/// Stable-sort `tasks` by `key`; equal keys keep their original relative
/// order.
pub fn sort_tasks(tasks: &mut [Task], key: SortKey, direction: SortDirection) {
    tasks.sort_by(|a, b| compare(a, b, key, direction));
}

/// The raw comparator behind [`sort_tasks`].
pub fn compare(a: &Task, b: &Task, key: SortKey, direction: SortDirection) -> Ordering {
    match key {
        SortKey::Name => {
            direction.apply(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        SortKey::Project => direction.apply(project_key(a).cmp(&project_key(b))),
        SortKey::Flagged => direction.apply(u8::from(a.flagged).cmp(&u8::from(b.flagged))),
        SortKey::DueDate => compare_dates(&a.due_date, &b.due_date, direction),
        SortKey::DeferDate => compare_dates(&a.defer_date, &b.defer_date, direction),
        SortKey::PlannedDate => compare_dates(&a.planned_date, &b.planned_date, direction),
        SortKey::CompletedDate => {
            compare_dates(&a.completion_date, &b.completion_date, direction)
        }
    }
}

fn project_key(task: &Task) -> String {
    task.project_name.as_deref().unwrap_or("").to_lowercase()
}

/// Date comparison where tasks lacking the field sort as "infinitely
/// late". Missing values stay last under either direction, so the
/// directional flip applies only when both sides have a parsable date.
fn compare_dates(a: &Option<String>, b: &Option<String>, direction: SortDirection) -> Ordering {
    let ta = a.as_deref().and_then(dates::timestamp);
    let tb = b.as_deref().and_then(dates::timestamp);
    match (ta, tb) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(id: &str) -> Task {
        Task::from_record(
            &serde_json::from_value(serde_json::json!({"id": id, "name": id})).unwrap(),
            0,
        )
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::Name);
        assert_eq!("dueDate".parse::<SortKey>().unwrap(), SortKey::DueDate);
        assert_eq!("defer_date".parse::<SortKey>().unwrap(), SortKey::DeferDate);
        assert!(matches!(
            "priority".parse::<SortKey>(),
            Err(QueryError::UnknownSortKey(_))
        ));
        assert!(matches!(
            "up".parse::<SortDirection>(),
            Err(QueryError::UnknownSortDirection(_))
        ));
    }

    #[test]
    fn test_name_sort_case_insensitive() {
        let mut tasks = vec![task("b"), task("a"), task("c")];
        tasks[0].name = "banana".to_string();
        tasks[1].name = "Apple".to_string();
        tasks[2].name = "cherry".to_string();
        sort_tasks(&mut tasks, SortKey::Name, SortDirection::Asc);
        assert_eq!(ids(&tasks), vec!["a", "b", "c"]);

        sort_tasks(&mut tasks, SortKey::Name, SortDirection::Desc);
        assert_eq!(ids(&tasks), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_stable_on_equal_keys() {
        let mut tasks = vec![task("first"), task("second"), task("third")];
        for t in &mut tasks {
            t.name = "same".to_string();
        }
        sort_tasks(&mut tasks, SortKey::Name, SortDirection::Asc);
        assert_eq!(ids(&tasks), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_date_sort_missing_last_asc() {
        let mut tasks = vec![task("none"), task("late"), task("early")];
        tasks[1].due_date = Some("2025-06-20".to_string());
        tasks[2].due_date = Some("2025-06-10".to_string());
        sort_tasks(&mut tasks, SortKey::DueDate, SortDirection::Asc);
        assert_eq!(ids(&tasks), vec!["early", "late", "none"]);
    }

    #[test]
    fn test_date_sort_missing_still_last_desc() {
        let mut tasks = vec![task("none"), task("late"), task("early")];
        tasks[1].due_date = Some("2025-06-20".to_string());
        tasks[2].due_date = Some("2025-06-10".to_string());
        sort_tasks(&mut tasks, SortKey::DueDate, SortDirection::Desc);
        assert_eq!(ids(&tasks), vec!["late", "early", "none"]);
    }

    #[test]
    fn test_unparsable_date_sorts_as_missing() {
        let mut tasks = vec![task("junk"), task("real")];
        tasks[0].due_date = Some("someday".to_string());
        tasks[1].due_date = Some("2025-06-10".to_string());
        sort_tasks(&mut tasks, SortKey::DueDate, SortDirection::Asc);
        assert_eq!(ids(&tasks), vec!["real", "junk"]);
    }

    #[test]
    fn test_flagged_sort() {
        let mut tasks = vec![task("flagged"), task("plain")];
        tasks[0].flagged = true;
        sort_tasks(&mut tasks, SortKey::Flagged, SortDirection::Asc);
        assert_eq!(ids(&tasks), vec!["plain", "flagged"]);
        sort_tasks(&mut tasks, SortKey::Flagged, SortDirection::Desc);
        assert_eq!(ids(&tasks), vec!["flagged", "plain"]);
    }

    #[test]
    fn test_project_sort_missing_uses_empty_string() {
        let mut tasks = vec![task("beta"), task("none"), task("alpha")];
        tasks[0].project_name = Some("Beta".to_string());
        tasks[2].project_name = Some("alpha".to_string());
        sort_tasks(&mut tasks, SortKey::Project, SortDirection::Asc);
        assert_eq!(ids(&tasks), vec!["none", "alpha", "beta"]);
    }
}
