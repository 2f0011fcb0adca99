use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::model::record::TaskRecord;
use crate::model::task::Task;

/// Options for one tree build.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Exclude completed and dropped records from the tree. Hidden
    /// records stay available for ancestry climbing only.
    pub hide_completed: bool,
    /// Group label for root tasks without a resolved project.
    pub inbox_label: String,
}

impl Default for TreeOptions {
    fn default() -> TreeOptions {
        TreeOptions {
            hide_completed: true,
            inbox_label: "Inbox".to_string(),
        }
    }
}

/// A task attached into the rebuilt forest.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub task: Task,
    /// The resolved parent identifier; `None` means this node is a root.
    /// Always names another node in the same build.
    pub parent_id: Option<String>,
    /// Children in original input order.
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    /// Number of tasks in this subtree, including the node itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TaskNode::count).sum::<usize>()
    }
}

/// Roots partitioned by resolved project name, in first-root-seen order.
/// Root nodes are referenced by index into [`TreeResult::root_tasks`];
/// descendants inherit their root's group regardless of their own
/// project field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectGroup {
    pub project_name: String,
    pub root_indexes: Vec<usize>,
    /// Recursive task count across the group's subtrees.
    pub task_count: usize,
}

/// The result of one tree build. Owned entirely by the invocation that
/// built it; nothing is shared or persisted across calls.
#[derive(Debug, Clone)]
pub struct TreeResult {
    pub root_tasks: Vec<TaskNode>,
    pub project_groups: Vec<ProjectGroup>,
    /// All visible tasks in input order, hierarchy discarded.
    pub flat_tasks: Vec<Task>,
    /// Total record count before the visibility rule, for "showing N of
    /// M" notes.
    pub total_count: usize,
}

impl TreeResult {
    /// The root nodes belonging to `group`, in order.
    pub fn group_roots<'a>(
        &'a self,
        group: &'a ProjectGroup,
    ) -> impl Iterator<Item = &'a TaskNode> {
        group.root_indexes.iter().map(move |&i| &self.root_tasks[i])
    }
}

/// Reconstruct a forest from an unordered flat record set.
///
/// Visible records become nodes; a record whose declared parent is hidden
/// climbs to its nearest visible ancestor, so completing a parent never
/// orphans its still-active children from view. Records with dangling or
/// cyclic ancestry fall back to roots. The result is always a forest: no
/// node is its own descendant.
pub fn build_tree(records: &[TaskRecord], options: &TreeOptions) -> TreeResult {
    let hidden =
        |r: &TaskRecord| options.hide_completed && (r.completed || r.dropped);

    // Full index for ancestry climbs; later records win on duplicate ids.
    let by_id: HashMap<&str, &TaskRecord> =
        records.iter().map(|r| (r.id.as_str(), r)).collect();

    let visible: Vec<(usize, &TaskRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| !hidden(r))
        .collect();
    let visible_ids: HashSet<&str> = visible.iter().map(|(_, r)| r.id.as_str()).collect();
    let pos_of: HashMap<&str, usize> = visible
        .iter()
        .enumerate()
        .map(|(pos, (_, r))| (r.id.as_str(), pos))
        .collect();

    let tasks: Vec<Task> = visible
        .iter()
        .map(|(order, r)| Task::from_record(r, *order))
        .collect();

    // Resolve each visible record to its nearest visible ancestor, then
    // re-check the full ancestry independently so longer cycles (not just
    // self-references) also force root status.
    let mut resolved: Vec<Option<String>> = Vec::with_capacity(visible.len());
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); visible.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (pos, (_, record)) in visible.iter().enumerate() {
        let parent = nearest_visible_parent(record, &by_id, &visible_ids)
            .filter(|pid| pid != &record.id && !creates_cycle(&record.id, pid, &by_id));
        match parent {
            Some(pid) => {
                if let Some(&parent_pos) = pos_of.get(pid.as_str()) {
                    children[parent_pos].push(pos);
                    resolved.push(Some(pid));
                } else {
                    roots.push(pos);
                    resolved.push(None);
                }
            }
            None => {
                roots.push(pos);
                resolved.push(None);
            }
        }
    }

    // Siblings are appended in input order already; sort explicitly so
    // renderer ordering never depends on map iteration details.
    roots.sort_unstable();
    for list in &mut children {
        list.sort_unstable();
    }

    let root_tasks: Vec<TaskNode> = roots
        .iter()
        .map(|&pos| materialize(pos, &tasks, &children, &resolved))
        .collect();

    let project_groups = group_by_project(&root_tasks, &options.inbox_label);

    TreeResult {
        root_tasks,
        project_groups,
        flat_tasks: tasks,
        total_count: records.len(),
    }
}

fn materialize(
    pos: usize,
    tasks: &[Task],
    children: &[Vec<usize>],
    resolved: &[Option<String>],
) -> TaskNode {
    TaskNode {
        task: tasks[pos].clone(),
        parent_id: resolved[pos].clone(),
        children: children[pos]
            .iter()
            .map(|&child| materialize(child, tasks, children, resolved))
            .collect(),
    }
}

/// Climb the declared parent chain through the full index until a visible
/// ancestor turns up. Returns `None` when the chain ends (absent or
/// dangling reference) or revisits an identifier (cyclic ancestry).
fn nearest_visible_parent(
    record: &TaskRecord,
    by_id: &HashMap<&str, &TaskRecord>,
    visible_ids: &HashSet<&str>,
) -> Option<String> {
    let mut parent_id = record.parent_id().map(str::to_string);
    let mut visited: HashSet<String> = HashSet::new();

    while let Some(pid) = parent_id {
        if !visited.insert(pid.clone()) {
            return None;
        }
        if visible_ids.contains(pid.as_str()) {
            return Some(pid);
        }
        parent_id = by_id
            .get(pid.as_str())?
            .parent_id()
            .map(str::to_string);
    }
    None
}

/// Whether attaching `node_id` under `parent_id` would make the node its
/// own ancestor, following the full declared ancestry.
fn creates_cycle(
    node_id: &str,
    parent_id: &str,
    by_id: &HashMap<&str, &TaskRecord>,
) -> bool {
    let mut visited: HashSet<String> = HashSet::from([node_id.to_string()]);
    let mut current = Some(parent_id.to_string());

    while let Some(pid) = current {
        if !visited.insert(pid.clone()) {
            return true;
        }
        current = match by_id.get(pid.as_str()) {
            Some(record) => record.parent_id().map(str::to_string),
            None => return false,
        };
    }
    false
}

fn group_by_project(root_tasks: &[TaskNode], inbox_label: &str) -> Vec<ProjectGroup> {
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (index, node) in root_tasks.iter().enumerate() {
        let name = node
            .task
            .project_name
            .clone()
            .unwrap_or_else(|| inbox_label.to_string());
        groups.entry(name).or_default().push(index);
    }
    groups
        .into_iter()
        .map(|(project_name, root_indexes)| {
            let task_count = root_indexes
                .iter()
                .map(|&i| root_tasks[i].count())
                .sum();
            ProjectGroup {
                project_name,
                root_indexes,
                task_count,
            }
        })
        .collect()
}
