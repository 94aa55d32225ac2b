//! coparent CLI - goal tracking and expense splitting for co-parents.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use coparent_core::{ChildId, ContactRow, DisplayStatus, Goal, GoalId, GoalStatus, PresetRatio};
use coparent_expense::{parse_amount, parse_percent, ExpenseDraft, SplitSelector};
use coparent_progress::{GoalTracker, GoalView, TrackerConfig};
use coparent_storage::{JsonStorage, Storage};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coparent")]
#[command(about = "Goal tracking and expense splitting for co-parents", long_about = None)]
struct Cli {
    /// Directory records are stored in
    #[arg(long, global = true, default_value = ".coparent")]
    data_dir: std::path::PathBuf,

    /// Pin "now" (RFC 3339) for deterministic output
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Do not record expiries discovered while listing goals
    #[arg(long, global = true)]
    no_persist_expiry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Goal tracking
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Shared expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),
    /// Family contacts
    #[command(subcommand)]
    Contact(ContactCommand),
}

#[derive(Subcommand)]
enum GoalCommand {
    /// Assign a new goal to a child
    Add {
        /// Child id
        #[arg(long)]
        child: String,
        /// Goal title
        #[arg(long)]
        title: String,
        /// Completions required for mastery (0 for none)
        #[arg(long, default_value = "0")]
        target: u32,
        /// Date the goal should be completed by (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// List goals
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show goal details
    Show {
        /// Goal ID
        id: GoalId,
    },
    /// Log a completion
    Inc {
        /// Goal ID
        id: GoalId,
    },
    /// Remove a completion
    Dec {
        /// Goal ID
        id: GoalId,
    },
    /// Set the status explicitly
    Status {
        /// Goal ID
        id: GoalId,
        /// working_on, mastered, behind, try_again or expired
        status: GoalStatus,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: GoalId,
    },
}

#[derive(Subcommand)]
enum ExpenseCommand {
    /// Preview how an amount splits
    Split {
        /// Amount as typed
        #[arg(long)]
        amount: String,
        #[command(flatten)]
        split: SplitArgs,
    },
    /// Submit an expense
    Add {
        /// What was paid for
        #[arg(long)]
        description: String,
        /// Amount as typed
        #[arg(long)]
        amount: String,
        /// Who paid up front
        #[arg(long)]
        paid_by: String,
        /// Child the expense was for
        #[arg(long)]
        child: Option<String>,
        #[command(flatten)]
        split: SplitArgs,
    },
    /// List expenses
    List,
}

#[derive(Args)]
struct SplitArgs {
    /// Preset split: 50-50, 25-75, 75-25, 70-30, 30-70 or 90-10
    #[arg(long, conflicts_with = "custom")]
    preset: Option<PresetRatio>,
    /// Custom split percentages
    #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
    custom: Option<Vec<String>>,
}

impl SplitArgs {
    fn selector(&self) -> SplitSelector {
        let mut selector = SplitSelector::new();
        if let Some(preset) = self.preset {
            selector.select_preset(preset);
        }
        if let Some(custom) = &self.custom {
            let first = custom.first().map(|s| parse_percent(s)).unwrap_or(0);
            let second = custom.get(1).map(|s| parse_percent(s)).unwrap_or(0);
            selector.set_custom(first, second);
        }
        selector
    }
}

#[derive(Subcommand)]
enum ContactCommand {
    /// Import contacts exported from the backend (JSON object or array)
    Import {
        /// JSON file
        file: std::path::PathBuf,
    },
    /// List contacts with their children
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(Utc::now);
    debug!(data_dir = %cli.data_dir.display(), %now, "starting");

    let storage = JsonStorage::new(&cli.data_dir)
        .await
        .with_context(|| format!("opening {}", cli.data_dir.display()))?;

    match cli.command {
        Commands::Goal(command) => {
            let config = TrackerConfig {
                persist_expiry: !cli.no_persist_expiry,
            };
            let tracker = GoalTracker::new(storage).with_config(config);
            run_goal(tracker, command, now).await
        }
        Commands::Expense(command) => run_expense(storage, command, now).await,
        Commands::Contact(command) => run_contact(storage, command).await,
    }
}

async fn run_goal(
    mut tracker: GoalTracker<JsonStorage>,
    command: GoalCommand,
    now: DateTime<Utc>,
) -> Result<()> {
    match command {
        GoalCommand::Add { child, title, target, due } => {
            let mut goal = Goal::new(ChildId::new(child), title, target, due);
            goal.created_at = now;
            goal.updated_at = now;
            tracker.storage_mut().save_goal(&goal).await?;
            println!("Added goal: {} - {}", goal.id, goal.title);
        }
        GoalCommand::List { json } => {
            let views = tracker.view_all(now).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
                return Ok(());
            }
            println!("Goals ({})", views.len());
            for view in views {
                println!(
                    "  {} | {:<11} | {} {} - {}",
                    view.goal_id,
                    view.status.label(),
                    format_bar(view.percent),
                    format_days(view.days_remaining),
                    view.title,
                );
            }
        }
        GoalCommand::Show { id } => {
            let view = tracker.view(id, now).await?;
            print_view(&view);
        }
        GoalCommand::Inc { id } => {
            tracker.increment(id, now).await?;
            print_view(&tracker.view(id, now).await?);
        }
        GoalCommand::Dec { id } => {
            tracker.decrement(id, now).await?;
            print_view(&tracker.view(id, now).await?);
        }
        GoalCommand::Status { id, status } => {
            tracker.set_status(id, status, now).await?;
            print_view(&tracker.view(id, now).await?);
        }
        GoalCommand::Delete { id } => {
            tracker.storage_mut().delete_goal(id).await?;
            println!("Deleted goal: {}", id);
        }
    }
    Ok(())
}

async fn run_expense(mut storage: JsonStorage, command: ExpenseCommand, now: DateTime<Utc>) -> Result<()> {
    match command {
        ExpenseCommand::Split { amount, split } => {
            let selector = split.selector();
            let total = parse_amount(&amount);
            let shares = selector.shares(total);
            println!("Total: {:.2}", total);
            println!("Split: {}", selector.ratio());
            match selector.validation_message() {
                Some(message) => println!("  {}", message),
                None => {
                    println!("  First:  {:.2}", shares.first);
                    println!("  Second: {:.2}", shares.second);
                }
            }
        }
        ExpenseCommand::Add { description, amount, paid_by, child, split } => {
            let draft = ExpenseDraft {
                child_id: child.map(ChildId::new),
                description,
                amount_text: amount,
                paid_by,
                selector: split.selector(),
            };
            let expense = draft.submit(now)?;
            storage.save_expense(&expense).await?;
            println!(
                "Added expense: {} - {} {:.2} ({}: {:.2} / {:.2})",
                expense.id,
                expense.description,
                expense.amount,
                expense.ratio,
                expense.shares.first,
                expense.shares.second,
            );
        }
        ExpenseCommand::List => {
            let expenses = storage.list_expenses().await?;
            println!("Expenses ({})", expenses.len());
            for expense in expenses {
                println!(
                    "  {} | {} | {:>10.2} | {} | paid by {} - {}",
                    expense.created_at.format("%Y-%m-%d"),
                    expense.ratio,
                    expense.amount,
                    format!("{:.2}/{:.2}", expense.shares.first, expense.shares.second),
                    expense.paid_by,
                    expense.description,
                );
            }
        }
    }
    Ok(())
}

async fn run_contact(mut storage: JsonStorage, command: ContactCommand) -> Result<()> {
    match command {
        ContactCommand::Import { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)?;
            let rows: Vec<ContactRow> = if value.is_array() {
                serde_json::from_value(value)?
            } else {
                vec![serde_json::from_value(value)?]
            };
            for row in &rows {
                storage.save_contact_row(row).await?;
            }
            println!("Imported {} contacts", rows.len());
        }
        ContactCommand::List => {
            let contacts = storage.list_contacts().await?;
            println!("Contacts ({})", contacts.len());
            for contact in contacts {
                let children: Vec<&str> = contact.children.iter().map(|c| c.name.as_str()).collect();
                println!(
                    "  {} | {} | {}",
                    contact.name,
                    contact.relationship.as_deref().unwrap_or("-"),
                    if children.is_empty() { "-".to_string() } else { children.join(", ") },
                );
            }
        }
    }
    Ok(())
}

fn print_view(view: &GoalView) {
    println!("Goal: {}", view.goal_id);
    println!("  Title: {}", view.title);
    println!("  Status: {}", view.status.label());
    println!("  Count: {}/{}", view.current_count, view.target_count);
    println!("  Progress: {}", format_bar(view.percent));
    println!("  Due: {}", format_days(view.days_remaining));
    if view.status == DisplayStatus::Expired {
        println!("  ** Expired **");
    }
}

fn format_bar(percent: Option<u8>) -> String {
    const WIDTH: usize = 10;
    match percent {
        Some(p) => {
            let filled = usize::from(p) * WIDTH / 100;
            format!("[{}{}] {:>3}%", "#".repeat(filled), "-".repeat(WIDTH - filled), p)
        }
        None => format!("{:width$}", "", width = WIDTH + 7),
    }
}

fn format_days(days: Option<i64>) -> String {
    match days {
        None => "no due date".to_string(),
        Some(d) if d > 1 => format!("{} days left", d),
        Some(1) => "1 day left".to_string(),
        Some(0) => "due today".to_string(),
        Some(d) => format!("{} days ago", -d),
    }
}
