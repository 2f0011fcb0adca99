use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("[>] tasklens v", env!("CARGO_PKG_VERSION"), " - query your tasks as trees"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read task records from this file ("-" or omitted: stdin)
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter and sort tasks as a flat list
    Filter(FilterArgs),
    /// Rebuild the task hierarchy and render it
    Tree(TreeArgs),
}

// ---------------------------------------------------------------------------
// Filter args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct FilterArgs {
    /// Filter by tag (repeatable; a task matches any of them)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Match tag names exactly instead of by substring
    #[arg(long)]
    pub exact_tag: bool,
    /// Filter by project name (substring)
    #[arg(long)]
    pub project: Option<String>,
    /// Free-text search over names and notes
    #[arg(long)]
    pub search: Option<String>,

    /// Only flagged tasks
    #[arg(long)]
    pub flagged: bool,
    /// Only tasks with a note
    #[arg(long)]
    pub has_note: bool,
    /// Only inbox tasks
    #[arg(long)]
    pub in_inbox: bool,

    /// Defer date falls on the current day
    #[arg(long)]
    pub defer_today: bool,
    /// Defer date falls within the current Monday-anchored week
    #[arg(long)]
    pub defer_this_week: bool,
    /// Undeferred, or deferred at/before now
    #[arg(long)]
    pub defer_available: bool,
    /// Defer date strictly before this date
    #[arg(long, value_name = "DATE")]
    pub defer_before: Option<String>,
    /// Defer date strictly after this date
    #[arg(long, value_name = "DATE")]
    pub defer_after: Option<String>,

    /// Planned date falls on the current day
    #[arg(long)]
    pub planned_today: bool,
    /// Planned date falls within the current week
    #[arg(long)]
    pub planned_this_week: bool,
    /// Planned date falls within the current month
    #[arg(long)]
    pub planned_this_month: bool,
    /// Planned date strictly before this date
    #[arg(long, value_name = "DATE")]
    pub planned_before: Option<String>,
    /// Planned date strictly after this date
    #[arg(long, value_name = "DATE")]
    pub planned_after: Option<String>,

    /// Due date falls on the current day
    #[arg(long)]
    pub due_today: bool,
    /// Due date falls within the current week
    #[arg(long)]
    pub due_this_week: bool,
    /// Due date falls within the current month
    #[arg(long)]
    pub due_this_month: bool,
    /// Due date is in the past
    #[arg(long)]
    pub overdue: bool,
    /// Due date strictly before this date
    #[arg(long, value_name = "DATE")]
    pub due_before: Option<String>,
    /// Due date strictly after this date
    #[arg(long, value_name = "DATE")]
    pub due_after: Option<String>,

    /// Completed on the current day
    #[arg(long)]
    pub completed_today: bool,
    /// Completed on the previous day
    #[arg(long)]
    pub completed_yesterday: bool,
    /// Completed within the current week
    #[arg(long)]
    pub completed_this_week: bool,
    /// Completed within the current month
    #[arg(long)]
    pub completed_this_month: bool,

    /// Minimum estimate in minutes
    #[arg(long, value_name = "MINUTES")]
    pub estimate_min: Option<f64>,
    /// Maximum estimate in minutes
    #[arg(long, value_name = "MINUTES")]
    pub estimate_max: Option<f64>,

    /// Sort key (name, dueDate, deferDate, plannedDate, completedDate,
    /// flagged, project)
    #[arg(long, default_value = "name")]
    pub sort: String,
    /// Sort direction (asc or desc)
    #[arg(long, default_value = "asc")]
    pub order: String,
    /// Maximum tasks to show (0 = unlimited)
    #[arg(long, default_value_t = 100)]
    pub limit: usize,
}

// ---------------------------------------------------------------------------
// Tree args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct TreeArgs {
    /// Display mode: project_tree, task_tree, or flat
    #[arg(long, default_value = "project_tree")]
    pub mode: String,
    /// Include completed and dropped tasks
    #[arg(long)]
    pub show_completed: bool,
    /// Group label for tasks without a project
    #[arg(long, default_value = "Inbox")]
    pub inbox_label: String,
    /// Maximum tasks in flat mode (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}
