//! `ticklist` command line client.
//!
//! # Responsibility
//! - Parse commands and drive the task list controller against the server.
//! - Render the agenda and per-command results in the terminal.

use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use ticklist_core::{default_log_level, init_logging, Task, TaskId};

use crate::api::HttpTasksApi;
use crate::controller::{MutationOutcome, TaskForm, TaskListController};

mod api;
mod controller;
mod render;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:7710";

#[derive(Parser)]
#[command(
    name = "ticklist",
    about = "A minimal task tracker for your terminal"
)]
struct Cli {
    /// Server base URL (falls back to TICKLIST_SERVER, then localhost)
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all tasks grouped by due date
    List,

    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Free-form details
        #[arg(short, long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Edit an existing task
    Edit {
        /// Task id
        id: TaskId,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New details
        #[arg(short, long)]
        description: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "no_due")]
        due: Option<NaiveDate>,

        /// Clear the due date
        #[arg(long)]
        no_due: bool,
    },

    /// Toggle a task between open and completed
    Toggle {
        /// Task id
        id: TaskId,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: TaskId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Sync diagnostics reach a file only when TICKLIST_LOG names a
    // directory; normal runs keep stderr for command output.
    if let Some(log_dir) = env_path("TICKLIST_LOG") {
        if let Err(err) = init_logging(default_log_level(), Some(&log_dir)) {
            eprintln!("Error: Failed to set up logging: {}", err);
            std::process::exit(1);
        }
    }

    let server_url = cli
        .server
        .or_else(|| env_string("TICKLIST_SERVER"))
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let api = HttpTasksApi::new(server_url);
    let mut controller = TaskListController::new(api);

    match cli.command {
        None | Some(Commands::List) => {
            refresh_or_exit(&mut controller);
            render::render_agenda(controller.state().tasks(), Local::now().date_naive());
        }
        Some(Commands::Add {
            title,
            description,
            due,
        }) => {
            ensure_title(&title);
            let form = TaskForm {
                title,
                description: description.unwrap_or_default(),
                due_date: due,
            };

            let task = commit_or_exit(controller.submit(form, None));
            println!("✓ Task added: {}", task.title);
            println!("  #{}", task.id);
        }
        Some(Commands::Edit {
            id,
            title,
            description,
            due,
            no_due,
        }) => {
            refresh_or_exit(&mut controller);
            let Some(current) = controller.state().find(id) else {
                eprintln!("Error: Task #{} not found", id);
                std::process::exit(1);
            };

            let form = TaskForm {
                title: title.unwrap_or_else(|| current.title.clone()),
                description: description.unwrap_or_else(|| current.description.clone()),
                due_date: if no_due { None } else { due.or(current.due_date) },
            };
            ensure_title(&form.title);

            let task = commit_or_exit(controller.submit(form, Some(id)));
            println!("✓ Task updated: {}", task.title);
        }
        Some(Commands::Toggle { id }) => {
            refresh_or_exit(&mut controller);
            let Some(outcome) = controller.toggle_completion(id) else {
                eprintln!("Error: Task #{} not found", id);
                std::process::exit(1);
            };

            let task = commit_or_exit(outcome);
            if task.is_completed {
                println!("✓ Task completed: {}", task.title);
            } else {
                println!("○ Task reopened: {}", task.title);
            }
        }
        Some(Commands::Rm { id, yes }) => {
            refresh_or_exit(&mut controller);
            let Some(target) = controller.state().find(id) else {
                eprintln!("Error: Task #{} not found", id);
                std::process::exit(1);
            };
            let title = target.title.clone();

            if !yes && !confirm("Delete this task?") {
                println!("Aborted");
                return;
            }

            commit_or_exit(controller.remove(id));
            println!("✓ Task deleted: {}", title);
        }
    }
}

fn ensure_title(title: &str) {
    if title.trim().is_empty() {
        eprintln!("Error: Task title cannot be blank");
        std::process::exit(1);
    }
}

fn refresh_or_exit(controller: &mut TaskListController<HttpTasksApi>) {
    if let Err(err) = controller.refresh() {
        eprintln!("Error: Failed to fetch tasks: {}", err);
        eprintln!("\nIs the server running? Start it with: ticklist-server");
        std::process::exit(1);
    }
}

fn commit_or_exit(outcome: MutationOutcome) -> Task {
    match outcome {
        MutationOutcome::Committed(task) => task,
        MutationOutcome::Failed(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }

    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

fn env_string(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    env_string(name).map(PathBuf::from)
}
