//! Terminal rendering for the agenda view.

use colored::*;
use ticklist_core::{build_agenda, DueBucket, Task};

use chrono::NaiveDate;

/// Get the appropriate status glyph for a task
fn status_glyph(task: &Task, is_overdue: bool) -> ColoredString {
    if task.is_completed {
        "✓".dimmed()
    } else if is_overdue {
        "●".red()
    } else {
        "○".normal()
    }
}

/// Render the view header with title and count
fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// Render a bucket header, highlighting overdue work
fn render_section_header(bucket: DueBucket) {
    let label = bucket.label();
    let styled = if bucket == DueBucket::Overdue {
        label.red().bold()
    } else {
        label.bold()
    };
    println!("  ─── {} ───\n", styled);
}

/// Render a single task line with id, glyph, and title
fn render_task_line(task: &Task, is_overdue: bool) {
    let id_str = format!("{:>3}", task.id);
    let glyph = status_glyph(task, is_overdue);
    let line = format!("  {}  {}  {}", id_str, glyph, task.title);

    let styled = if task.is_completed {
        line.dimmed()
    } else {
        line.bold()
    };
    println!("{}", styled);

    if !task.description.is_empty() {
        println!("          {}", task.description.dimmed());
    }
}

/// Render the full task list, bucketed by due date against `today`
pub fn render_agenda(tasks: &[Task], today: NaiveDate) {
    if tasks.is_empty() {
        println!("No tasks yet");
        return;
    }

    let sections = build_agenda(tasks, today);
    let total: usize = sections.iter().map(|section| section.tasks.len()).sum();
    render_view_header("To-Do List", total);

    for section in &sections {
        render_section_header(section.bucket);
        let is_overdue = section.bucket == DueBucket::Overdue;
        for task in &section.tasks {
            render_task_line(task, is_overdue);
        }
        println!();
    }
}
