use serde::Serialize;

use crate::model::task::Task;
use crate::ops::tree::{TaskNode, TreeResult};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    pub id: String,
    pub name: String,
    pub completed: bool,
    pub dropped: bool,
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskNodeJson {
    #[serde(flatten)]
    pub task: TaskJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskNodeJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGroupJson {
    pub project_name: String,
    pub task_count: usize,
    pub root_tasks: Vec<TaskNodeJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeJson {
    pub root_tasks: Vec<TaskNodeJson>,
    pub project_groups: Vec<ProjectGroupJson>,
    pub flat_tasks: Vec<TaskJson>,
    pub total_count: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        name: task.name.clone(),
        completed: task.completed,
        dropped: task.dropped,
        flagged: task.flagged,
        project_name: task.project_name.clone(),
        tags: task.display_tags(),
        note: if task.has_note() {
            Some(task.note.clone())
        } else {
            None
        },
        due_date: task.due_date.clone(),
        defer_date: task.defer_date.clone(),
        planned_date: task.planned_date.clone(),
        completion_date: task.completion_date.clone(),
        estimated_minutes: task.estimated_minutes,
    }
}

pub fn node_to_json(node: &TaskNode) -> TaskNodeJson {
    TaskNodeJson {
        task: task_to_json(&node.task),
        parent_id: node.parent_id.clone(),
        children: node.children.iter().map(node_to_json).collect(),
    }
}

pub fn tree_to_json(result: &TreeResult) -> TreeJson {
    TreeJson {
        root_tasks: result.root_tasks.iter().map(node_to_json).collect(),
        project_groups: result
            .project_groups
            .iter()
            .map(|group| ProjectGroupJson {
                project_name: group.project_name.clone(),
                task_count: group.task_count,
                root_tasks: result.group_roots(group).map(node_to_json).collect(),
            })
            .collect(),
        flat_tasks: result.flat_tasks.iter().map(task_to_json).collect(),
        total_count: result.total_count,
    }
}
