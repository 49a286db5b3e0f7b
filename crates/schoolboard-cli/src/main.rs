//! schoolboard CLI: admin client for the school-management backend.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use schoolboard_core::model::{AssessmentStatus, ResourceKind};

mod commands;

#[derive(Parser)]
#[command(
    name = "schoolboard",
    version,
    about = "Command-line client for the school-management backend"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter schoolboard.toml
    Init,

    /// Edit the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Log in and store the session
    Login {
        /// Account email (default: from config)
        #[arg(long)]
        email: Option<String>,

        /// Account password (default: from config)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List records of a resource
    List {
        /// Resource name (classes, teachers, students, courses, subjects,
        /// terms, timetable, assessments, announcements, complaints, leave)
        resource: ResourceKind,

        /// Case-insensitive substring filter
        #[arg(long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Records per page (default: page_size from config)
        #[arg(long)]
        per_page: Option<usize>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show one record
    Show { resource: ResourceKind, id: String },

    /// Create a record from key=value fields
    Create {
        resource: ResourceKind,

        /// Field value, e.g. --set name="Grade 7A" (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Update fields of an existing record
    Update {
        resource: ResourceKind,
        id: String,

        /// Field value, e.g. --set gradeLevel=7 (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Delete a record
    Delete { resource: ResourceKind, id: String },

    /// Manage assessments
    Assessment {
        #[command(subcommand)]
        action: AssessmentAction,
    },

    /// Show a class timetable
    Timetable {
        #[command(subcommand)]
        action: TimetableAction,
    },

    /// Decide leave requests
    Leave {
        #[command(subcommand)]
        action: LeaveAction,
    },

    /// Handle complaints
    Complaint {
        #[command(subcommand)]
        action: ComplaintAction,
    },

    /// Check an assessment date range without contacting the backend
    CheckDates {
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,

        #[arg(long, value_parser = parse_date_arg)]
        end: NaiveDate,

        /// Reference date (default: today)
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<NaiveDate>,
    },

    /// Dashboard counts across resources
    Overview {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a key, e.g. `base_url` or `auth.email`
    Set { key: String, value: String },
}

#[derive(Subcommand)]
enum AssessmentAction {
    /// Create an assessment
    Create {
        #[arg(long)]
        name: String,

        /// Term id
        #[arg(long)]
        term: String,

        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,

        #[arg(long, value_parser = parse_date_arg)]
        end: NaiveDate,

        #[arg(long)]
        description: Option<String>,
    },

    /// List assessments grouped by status
    List {
        /// Only this status
        #[arg(long)]
        status: Option<AssessmentStatus>,

        /// Output format: table, markdown, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Change an assessment's status
    Status {
        id: String,
        status: AssessmentStatus,

        /// Skip the lifecycle check
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum TimetableAction {
    /// Render the weekly grid
    Show {
        /// Class id to fetch from the backend
        #[arg(long, required_unless_present = "input")]
        class: Option<String>,

        /// Offline JSON file instead of the backend
        #[arg(long, conflicts_with = "class")]
        input: Option<PathBuf>,

        /// Output format: table, markdown, html
        #[arg(long, default_value = "table")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum LeaveAction {
    /// Approve a leave request
    Approve { id: String },
    /// Reject a leave request
    Reject { id: String },
}

#[derive(Subcommand)]
enum ComplaintAction {
    /// Mark a complaint resolved
    Resolve { id: String },
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    schoolboard_core::serde_dates::parse_date(s)
        .ok_or_else(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("schoolboard=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Config {
            action: ConfigAction::Set { key, value },
        } => commands::config::set(config, key, value),
        Commands::Login { email, password } => {
            commands::auth::login(config, email, password).await
        }
        Commands::Logout => commands::auth::logout(config),
        Commands::Whoami => commands::auth::whoami(config),
        Commands::List {
            resource,
            search,
            page,
            per_page,
            format,
        } => commands::resource::list(config, resource, search, page, per_page, format).await,
        Commands::Show { resource, id } => commands::resource::show(config, resource, id).await,
        Commands::Create { resource, fields } => {
            commands::resource::create(config, resource, fields).await
        }
        Commands::Update {
            resource,
            id,
            fields,
        } => commands::resource::update(config, resource, id, fields).await,
        Commands::Delete { resource, id } => {
            commands::resource::delete(config, resource, id).await
        }
        Commands::Assessment { action } => match action {
            AssessmentAction::Create {
                name,
                term,
                start,
                end,
                description,
            } => commands::assessment::create(config, name, term, start, end, description).await,
            AssessmentAction::List { status, format } => {
                commands::assessment::list(config, status, format).await
            }
            AssessmentAction::Status { id, status, force } => {
                commands::assessment::set_status(config, id, status, force).await
            }
        },
        Commands::Timetable {
            action:
                TimetableAction::Show {
                    class,
                    input,
                    format,
                    output,
                },
        } => commands::timetable::show(config, class, input, format, output).await,
        Commands::Leave { action } => match action {
            LeaveAction::Approve { id } => commands::leave::approve(config, id).await,
            LeaveAction::Reject { id } => commands::leave::reject(config, id).await,
        },
        Commands::Complaint {
            action: ComplaintAction::Resolve { id },
        } => commands::complaint::resolve(config, id).await,
        Commands::CheckDates { start, end, today } => {
            commands::check_dates::execute(start, end, today)
        }
        Commands::Overview { format } => commands::overview::execute(config, format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
