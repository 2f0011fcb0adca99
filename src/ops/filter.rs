use chrono::{DateTime, Local};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::model::task::Task;
use crate::util::dates;

/// Tag filter candidates: a single name or a list. A task matches when at
/// least one candidate matches at least one of its tags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagFilter {
    One(String),
    Many(Vec<String>),
}

impl TagFilter {
    fn candidates(&self) -> Vec<String> {
        let raw: Vec<&String> = match self {
            TagFilter::One(tag) => vec![tag],
            TagFilter::Many(tags) => tags.iter().collect(),
        };
        raw.iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// A multi-dimensional filter specification. Every predicate is optional;
/// active predicates combine with logical AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub tag_filter: Option<TagFilter>,
    pub exact_tag_match: bool,

    pub defer_today: bool,
    pub defer_this_week: bool,
    /// Undeferred, or deferred at/before now.
    pub defer_available: bool,
    pub defer_before: Option<String>,
    pub defer_after: Option<String>,

    pub planned_today: bool,
    pub planned_this_week: bool,
    pub planned_this_month: bool,
    pub planned_before: Option<String>,
    pub planned_after: Option<String>,

    pub due_today: bool,
    pub due_this_week: bool,
    pub due_this_month: bool,
    pub overdue: bool,
    pub due_before: Option<String>,
    pub due_after: Option<String>,

    pub completed_today: bool,
    pub completed_yesterday: bool,
    pub completed_this_week: bool,
    pub completed_this_month: bool,
    pub completed_before: Option<String>,
    pub completed_after: Option<String>,

    /// Case-insensitive substring search over name and note.
    pub search_text: Option<String>,

    pub has_estimate: Option<bool>,
    pub estimate_min: Option<f64>,
    pub estimate_max: Option<f64>,

    pub flagged: Option<bool>,
    pub has_note: Option<bool>,
    pub in_inbox: Option<bool>,

    /// Case-insensitive substring match on the project name.
    pub project_filter: Option<String>,
}

impl FilterSpec {
    /// Return the subset of `tasks` matching every active predicate,
    /// evaluated against the current local time.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        self.apply_at(tasks, Local::now())
    }

    /// Like [`FilterSpec::apply`], with an explicit "now" for the
    /// calendar-window predicates.
    pub fn apply_at(&self, tasks: &[Task], now: DateTime<Local>) -> Vec<Task> {
        let search = self.search_regex();
        tasks
            .iter()
            .filter(|task| self.matches(task, now, search.as_ref()))
            .cloned()
            .collect()
    }

    fn matches(&self, task: &Task, now: DateTime<Local>, search: Option<&Regex>) -> bool {
        self.matches_tags(task)
            && self.matches_defer(task, now)
            && self.matches_planned(task, now)
            && self.matches_due(task, now)
            && self.matches_completed(task, now)
            && self.matches_search(task, search)
            && self.matches_estimate(task)
            && self.matches_flags(task)
            && self.matches_project(task)
    }

    fn matches_tags(&self, task: &Task) -> bool {
        let Some(filter) = &self.tag_filter else {
            return true;
        };
        let candidates = filter.candidates();
        if candidates.is_empty() {
            return true;
        }
        let task_tags: Vec<String> = task.tags.iter().map(|t| t.to_lowercase()).collect();
        if task_tags.is_empty() {
            return false;
        }
        candidates.iter().any(|candidate| {
            task_tags.iter().any(|tag| {
                if self.exact_tag_match {
                    tag == candidate
                } else {
                    tag.contains(candidate.as_str())
                }
            })
        })
    }

    fn matches_defer(&self, task: &Task, now: DateTime<Local>) -> bool {
        let date = parse_field(&task.defer_date);
        if self.defer_today && !date.is_some_and(|d| dates::is_same_day(d, now)) {
            return false;
        }
        if self.defer_this_week && !date.is_some_and(|d| dates::is_in_week(d, now)) {
            return false;
        }
        if self.defer_available && !date.is_none_or(|d| d <= now) {
            return false;
        }
        in_bounds(date, &self.defer_before, &self.defer_after)
    }

    fn matches_planned(&self, task: &Task, now: DateTime<Local>) -> bool {
        let date = parse_field(&task.planned_date);
        if self.planned_today && !date.is_some_and(|d| dates::is_same_day(d, now)) {
            return false;
        }
        if self.planned_this_week && !date.is_some_and(|d| dates::is_in_week(d, now)) {
            return false;
        }
        if self.planned_this_month && !date.is_some_and(|d| dates::is_in_month(d, now)) {
            return false;
        }
        in_bounds(date, &self.planned_before, &self.planned_after)
    }

    fn matches_due(&self, task: &Task, now: DateTime<Local>) -> bool {
        let date = parse_field(&task.due_date);
        if self.due_today && !date.is_some_and(|d| dates::is_same_day(d, now)) {
            return false;
        }
        if self.due_this_week && !date.is_some_and(|d| dates::is_in_week(d, now)) {
            return false;
        }
        if self.due_this_month && !date.is_some_and(|d| dates::is_in_month(d, now)) {
            return false;
        }
        if self.overdue && !date.is_some_and(|d| d < now) {
            return false;
        }
        in_bounds(date, &self.due_before, &self.due_after)
    }

    fn matches_completed(&self, task: &Task, now: DateTime<Local>) -> bool {
        let date = parse_field(&task.completion_date);
        if self.completed_today && !date.is_some_and(|d| dates::is_same_day(d, now)) {
            return false;
        }
        if self.completed_yesterday && !date.is_some_and(|d| dates::is_yesterday(d, now)) {
            return false;
        }
        if self.completed_this_week && !date.is_some_and(|d| dates::is_in_week(d, now)) {
            return false;
        }
        if self.completed_this_month && !date.is_some_and(|d| dates::is_in_month(d, now)) {
            return false;
        }
        in_bounds(date, &self.completed_before, &self.completed_after)
    }

    fn matches_search(&self, task: &Task, search: Option<&Regex>) -> bool {
        match search {
            Some(re) => re.is_match(&task.name) || re.is_match(&task.note),
            None => true,
        }
    }

    fn matches_estimate(&self, task: &Task) -> bool {
        if let Some(wanted) = self.has_estimate {
            if task.estimated_minutes.is_some() != wanted {
                return false;
            }
        }
        if let Some(min) = self.estimate_min {
            if !task.estimated_minutes.is_some_and(|est| est >= min) {
                return false;
            }
        }
        if let Some(max) = self.estimate_max {
            if !task.estimated_minutes.is_some_and(|est| est <= max) {
                return false;
            }
        }
        true
    }

    fn matches_flags(&self, task: &Task) -> bool {
        if let Some(flagged) = self.flagged {
            if task.flagged != flagged {
                return false;
            }
        }
        if let Some(has_note) = self.has_note {
            if task.has_note() != has_note {
                return false;
            }
        }
        if let Some(in_inbox) = self.in_inbox {
            if task.is_inbox() != in_inbox {
                return false;
            }
        }
        true
    }

    fn matches_project(&self, task: &Task) -> bool {
        let Some(filter) = &self.project_filter else {
            return true;
        };
        let filter = filter.trim().to_lowercase();
        if filter.is_empty() {
            return true;
        }
        task.project_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&filter))
    }

    /// Compiled search pattern: escaped, case-insensitive. `None` when
    /// the predicate is inactive.
    fn search_regex(&self) -> Option<Regex> {
        let text = self.search_text.as_deref()?.trim();
        if text.is_empty() {
            return None;
        }
        RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
            .ok()
    }
}

fn parse_field(value: &Option<String>) -> Option<DateTime<Local>> {
    value.as_deref().and_then(dates::parse_date)
}

/// Check explicit before/after bounds. A bound whose own date string does
/// not parse is inactive (a data-quality degrade, matching the source's
/// behavior); only tasks that provide the field can satisfy an active
/// bound.
fn in_bounds(
    date: Option<DateTime<Local>>,
    before: &Option<String>,
    after: &Option<String>,
) -> bool {
    if let Some(bound) = before.as_deref().and_then(dates::parse_date) {
        if !date.is_some_and(|d| d < bound) {
            return false;
        }
    }
    if let Some(bound) = after.as_deref().and_then(dates::parse_date) {
        if !date.is_some_and(|d| d > bound) {
            return false;
        }
    }
    true
}
