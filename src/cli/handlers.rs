use std::error::Error;
use std::fs;
use std::io::Read;

use crate::cli::commands::{Cli, Commands, FilterArgs, TreeArgs};
use crate::cli::output::{task_to_json, tree_to_json};
use crate::model::record::TaskRecord;
use crate::ops::filter::{FilterSpec, TagFilter};
use crate::ops::query::{filter_and_sort, parse_records};
use crate::ops::tree::{TreeOptions, build_tree};
use crate::render::{DisplayMode, render, render_flat_tasks};

/// Top-level command dispatch.
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let text = read_input(cli.input.as_deref())?;
    let records = parse_records(&text)?;

    match cli.command {
        Commands::Filter(args) => cmd_filter(&records, args, cli.json),
        Commands::Tree(args) => cmd_tree(&records, args, cli.json),
    }
}

/// Read the record JSON from a file, or from stdin for `-`/absent.
fn read_input(path: Option<&str>) -> Result<String, Box<dyn Error>> {
    match path {
        Some(path) if path != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn cmd_filter(records: &[TaskRecord], args: FilterArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let key = args.sort.parse()?;
    let direction = args.order.parse()?;
    let spec = filter_spec_from_args(&args);
    // The renderer applies the cap itself so its footer can report how
    // many matches were hidden.
    let tasks = filter_and_sort(records, &spec, key, direction, 0);

    if json {
        let shown = if args.limit > 0 {
            tasks.len().min(args.limit)
        } else {
            tasks.len()
        };
        let items: Vec<_> = tasks[..shown].iter().map(task_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print!("{}", render_flat_tasks(&tasks, args.limit));
    }
    Ok(())
}

fn cmd_tree(records: &[TaskRecord], args: TreeArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let mode: DisplayMode = args.mode.parse()?;
    let options = TreeOptions {
        hide_completed: !args.show_completed,
        inbox_label: args.inbox_label.clone(),
    };
    let result = build_tree(records, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&tree_to_json(&result))?);
    } else {
        print!("{}", render(&result, mode, args.limit));
    }
    Ok(())
}

/// Map CLI flags onto a filter specification. Boolean flags that were not
/// passed stay inactive rather than filtering for `false`.
fn filter_spec_from_args(args: &FilterArgs) -> FilterSpec {
    FilterSpec {
        tag_filter: if args.tags.is_empty() {
            None
        } else {
            Some(TagFilter::Many(args.tags.clone()))
        },
        exact_tag_match: args.exact_tag,
        project_filter: args.project.clone(),
        search_text: args.search.clone(),
        flagged: args.flagged.then_some(true),
        has_note: args.has_note.then_some(true),
        in_inbox: args.in_inbox.then_some(true),
        defer_today: args.defer_today,
        defer_this_week: args.defer_this_week,
        defer_available: args.defer_available,
        defer_before: args.defer_before.clone(),
        defer_after: args.defer_after.clone(),
        planned_today: args.planned_today,
        planned_this_week: args.planned_this_week,
        planned_this_month: args.planned_this_month,
        planned_before: args.planned_before.clone(),
        planned_after: args.planned_after.clone(),
        due_today: args.due_today,
        due_this_week: args.due_this_week,
        due_this_month: args.due_this_month,
        overdue: args.overdue,
        due_before: args.due_before.clone(),
        due_after: args.due_after.clone(),
        completed_today: args.completed_today,
        completed_yesterday: args.completed_yesterday,
        completed_this_week: args.completed_this_week,
        completed_this_month: args.completed_this_month,
        estimate_min: args.estimate_min,
        estimate_max: args.estimate_max,
        ..FilterSpec::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_spec_from_args() {
        let args = FilterArgs {
            tags: vec!["work".to_string()],
            exact_tag: true,
            flagged: true,
            defer_today: true,
            ..FilterArgs::default()
        };
        let spec = filter_spec_from_args(&args);
        assert!(matches!(spec.tag_filter, Some(TagFilter::Many(_))));
        assert!(spec.exact_tag_match);
        assert_eq!(spec.flagged, Some(true));
        assert!(spec.defer_today);
        // Unset boolean flags stay inactive.
        assert_eq!(spec.has_note, None);
        assert_eq!(spec.in_inbox, None);
    }
}
