//! Command-line surface of the `tally` binary
//!
//! Every subcommand maps onto one command function and yields a JSON value.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tally_domain::utils::seconds_to_delta;
use tally_domain::{
    ActivityFilter, Category, DateRange, EntryEdit, EntryId, EntryListQuery, ManualEntry,
    NewProject, Period, ProjectId, ReportFilter, Result, TallyError, UserId,
};

use crate::commands;
use crate::context::AppContext;

/// Timer and activity accounting for the terminal.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about)]
pub struct Cli {
    /// Caller identity; every operation is scoped to this user.
    #[arg(long, short, global = true, env = "TALLY_USER", default_value = "local")]
    pub user: String,

    /// Explicit configuration file (TOML or JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured database path.
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a running entry.
    Start {
        #[arg(long, short, default_value = "")]
        title: String,
        #[arg(long, short)]
        project: Option<ProjectId>,
    },
    /// Stop the running or paused entry.
    Stop,
    /// Pause the running entry.
    Pause,
    /// Resume the paused entry.
    Resume,
    /// Show the current timer state.
    Status,
    /// Hours per project per day.
    Series(ActivityArgs),
    /// Totals by category and earnings by project.
    Summary(ActivityArgs),
    /// Closed entries of a date range with totals. A reversed range is empty.
    Report {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        project: Option<ProjectId>,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Daily earnings and payroll deductions for a project.
    Earnings {
        #[arg(long)]
        project: ProjectId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Record a closed entry after the fact.
    Manual {
        #[arg(long, default_value = "")]
        title: String,
        /// RFC 3339 instant.
        #[arg(long)]
        start: DateTime<Utc>,
        /// RFC 3339 instant.
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long, default_value_t = 0)]
        paused_secs: i64,
        #[arg(long)]
        project: Option<ProjectId>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Edit an existing entry.
    Edit(EditArgs),
    /// Archive entries, or restore them with `--restore`.
    Archive {
        #[arg(required = true)]
        ids: Vec<EntryId>,
        #[arg(long)]
        restore: bool,
    },
    /// Flip one entry's archive flag.
    ToggleArchive { id: EntryId },
    /// List entries, newest first.
    List {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        project: Option<ProjectId>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        archived: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// One entry with formatted durations.
    Details { id: EntryId },
    /// Latest closed entries.
    Recent {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Project management.
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0.0)]
        rate: f64,
        #[arg(long, default_value = "work")]
        category: Category,
        #[arg(long, default_value = "")]
        description: String,
    },
    List {
        #[arg(long)]
        archived: bool,
    },
    /// Flip a project's archive flag.
    Archive {
        id: ProjectId,
        /// Apply the same flag to the project's entries.
        #[arg(long)]
        cascade: bool,
    },
}

/// Range selection shared by `series` and `summary`.
///
/// `--from` wins over `--period`; without either the configured default
/// period applies.
#[derive(Debug, Clone, Args)]
pub struct ActivityArgs {
    #[arg(long, conflicts_with = "from")]
    pub period: Option<Period>,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub project: Option<ProjectId>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub archived: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    pub id: EntryId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long, conflicts_with = "clear_project")]
    pub project: Option<ProjectId>,
    #[arg(long)]
    pub clear_project: bool,
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,
    #[arg(long)]
    pub paused_secs: Option<i64>,
}

impl ActivityArgs {
    fn into_filter(self, ctx: &AppContext) -> ActivityFilter {
        let base = match self.from {
            Some(from) => ActivityFilter::new(Some(from), self.to.unwrap_or_else(|| ctx.today())),
            None => {
                let mut filter = commands::period_filter(ctx, self.period);
                if let Some(to) = self.to {
                    filter.end = to;
                }
                filter
            }
        };
        base.with_project(self.project).with_category(self.category).with_archived(self.archived)
    }
}

impl From<EditArgs> for EntryEdit {
    fn from(args: EditArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            notes: args.notes,
            category: args.category,
            project_id: args.project,
            clear_project: args.clear_project,
            start_time: args.start,
            end_time: args.end,
            paused_seconds: args.paused_secs,
        }
    }
}

/// Run one subcommand against the context.
///
/// # Errors
///
/// Whatever the underlying command returns.
pub async fn dispatch(ctx: &AppContext, user: &UserId, command: Command) -> Result<Value> {
    match command {
        Command::Start { title, project } => {
            to_json(commands::start_timer(ctx, user, &title, project).await?)
        }
        Command::Stop => to_json(commands::stop_timer(ctx, user).await?),
        Command::Pause => to_json(commands::pause_timer(ctx, user).await?),
        Command::Resume => to_json(commands::resume_timer(ctx, user).await?),
        Command::Status => to_json(commands::timer_status(ctx, user).await?),
        Command::Series(args) => {
            let filter = args.into_filter(ctx);
            to_json(commands::get_activity_series(ctx, user, &filter).await?)
        }
        Command::Summary(args) => {
            let filter = args.into_filter(ctx);
            to_json(commands::get_summary(ctx, user, &filter).await?)
        }
        Command::Report { from, to, project, category } => {
            let range = DateRange { start: from, end: to };
            let mut filter = ReportFilter::new(range).with_project(project);
            filter.category = category;
            to_json(commands::get_report(ctx, user, &filter).await?)
        }
        Command::Earnings { project, from, to } => {
            let range = DateRange { start: from, end: to };
            to_json(commands::get_earnings(ctx, user, project, range).await?)
        }
        Command::Manual {
            title,
            start,
            end,
            paused_secs,
            project,
            category,
            description,
            notes,
        } => {
            let input = ManualEntry {
                title,
                project_id: project,
                category,
                start_time: start,
                end_time: end,
                paused_duration: seconds_to_delta(paused_secs)?,
                description,
                notes,
            };
            to_json(commands::create_manual_entry(ctx, user, input).await?)
        }
        Command::Edit(args) => {
            let id = args.id;
            to_json(commands::edit_entry(ctx, user, id, args.into()).await?)
        }
        Command::Archive { ids, restore } => {
            let changed = commands::archive_entries(ctx, user, &ids, !restore).await?;
            to_json(serde_json::json!({ "changed": changed }))
        }
        Command::ToggleArchive { id } => {
            let archived = commands::toggle_entry_archive(ctx, user, id).await?;
            to_json(serde_json::json!({ "id": id, "is_archived": archived }))
        }
        Command::List { from, to, project, category, archived, limit } => {
            let query = EntryListQuery {
                start: from,
                end: to,
                project_id: project,
                category,
                include_archived: archived,
                limit,
            };
            to_json(commands::list_entries(ctx, user, query).await?)
        }
        Command::Details { id } => to_json(commands::entry_details(ctx, user, id).await?),
        Command::Recent { limit } => to_json(commands::recent_entries(ctx, user, limit).await?),
        Command::Project { command } => dispatch_project(ctx, user, command).await,
    }
}

async fn dispatch_project(ctx: &AppContext, user: &UserId, command: ProjectCommand) -> Result<Value> {
    match command {
        ProjectCommand::Create { name, rate, category, description } => {
            let input = NewProject { name, description, category, hourly_rate: rate };
            to_json(commands::create_project(ctx, user, input).await?)
        }
        ProjectCommand::List { archived } => {
            to_json(commands::list_projects(ctx, user, archived).await?)
        }
        ProjectCommand::Archive { id, cascade } => {
            to_json(commands::toggle_project_archive(ctx, user, id, cascade).await?)
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|err| TallyError::Internal(format!("failed to serialize output: {err}")))
}
