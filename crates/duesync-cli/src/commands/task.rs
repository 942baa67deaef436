//! Task management commands for the CLI.

use clap::Subcommand;
use duesync_core::storage::{Config, TaskDb, TaskFilter};
use duesync_core::sync::parse_due_date;
use duesync_core::task::{Task, TaskStatus};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Project ID to associate with
        #[arg(long)]
        project_id: Option<String>,
        /// Assignee (defaults to the configured user)
        #[arg(long)]
        assign: Option<String>,
    },
    /// List tasks
    List {
        /// Filter by status (todo, in_progress, done)
        #[arg(long)]
        status: Option<String>,
        /// Filter by project ID
        #[arg(long)]
        project_id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// New status (todo, in_progress, done)
        #[arg(long)]
        status: Option<String>,
    },
    /// Mark a task done
    Done {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = TaskDb::open()?;
    let config = Config::load()?;

    match action {
        TaskAction::Create {
            title,
            description,
            due,
            project_id,
            assign,
        } => {
            let mut task = Task::new(title, assign.unwrap_or(config.user));
            task.description = description;
            task.project_id = project_id;
            if let Some(due) = due {
                task.due_date = Some(parse_due_date(&due)?);
            }
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
        }
        TaskAction::List {
            status,
            project_id,
            json,
        } => {
            let status = match status {
                Some(s) => Some(
                    TaskStatus::parse(&s)
                        .ok_or_else(|| format!("Unknown status: {s}. Valid: todo, in_progress, done"))?,
                ),
                None => None,
            };
            let filter = TaskFilter {
                assigned_to: Some(config.user),
                status,
                project_id,
                ..Default::default()
            };
            let tasks = db.list_tasks(&filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in &tasks {
                    print_task_line(task);
                }
            }
        }
        TaskAction::Get { id } => {
            let task = db.get_task(&id)?.ok_or_else(|| format!("Task not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            due,
            clear_due,
            status,
        } => {
            let mut task = db.get_task(&id)?.ok_or_else(|| format!("Task not found: {id}"))?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = Some(description);
            }
            if let Some(due) = due {
                task.due_date = Some(parse_due_date(&due)?);
            }
            if clear_due {
                task.due_date = None;
            }
            if let Some(s) = status {
                task.status = TaskStatus::parse(&s)
                    .ok_or_else(|| format!("Unknown status: {s}. Valid: todo, in_progress, done"))?;
            }
            db.update_task(&task)?;
            println!("Task updated: {}", task.id);
            if task.calendar_link.is_linked() {
                println!("Note: task has a linked calendar event. Run 'duesync-cli sync event update {id}' to push the change.");
            }
        }
        TaskAction::Done { id } => {
            let mut task = db.get_task(&id)?.ok_or_else(|| format!("Task not found: {id}"))?;
            task.status = TaskStatus::Done;
            db.update_task(&task)?;
            println!("Task done: {}", task.id);
        }
        TaskAction::Delete { id } => {
            db.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
    }

    Ok(())
}

fn print_task_line(task: &Task) {
    let due = task
        .due_date
        .map(|d| format!(" due {d}"))
        .unwrap_or_default();
    let linked = if task.calendar_link.is_linked() {
        " [synced]"
    } else {
        ""
    };
    println!(
        "{}  [{}]{}{} {}",
        task.id,
        task.status.as_str(),
        due,
        linked,
        task.title
    );
}
