use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use taskboard::config::TaskboardConfig;
use taskboard::logging::{self, LogOptions};
use taskboard_common::Column;

mod cmd;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version, about = "Kanban project boards from the terminal")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL. Overrides TASKBOARD_API_URL and taskboard.toml.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to taskboard.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        surname: String,
        /// Prompted for (twice) when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Change your password
    Passwd,
    /// Show the signed-in member
    Whoami {
        /// Fetch the profile from the server first
        #[arg(long)]
        refresh: bool,
    },
    /// Edit your profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        lastname: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Avatar image URL
        #[arg(long)]
        img: Option<String>,
    },
    /// List and manage projects
    Projects {
        #[command(subcommand)]
        command: Option<ProjectsCommands>,
    },
    /// Show a project's board
    Board {
        project_id: String,
        /// Print the board as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move a task to a column (todo, progress, done)
    Move {
        project_id: String,
        task_id: String,
        column: Column,
        /// Position in the destination column (defaults to the end)
        #[arg(long)]
        index: Option<usize>,
    },
    /// Create, edit and assign tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// List project members, or invite one
    Members {
        project_id: String,
        #[arg(long)]
        invite: Option<String>,
        #[arg(long, default_value = "MEMBER", requires = "invite")]
        role: String,
    },
    /// List project meetings, or schedule one
    Meetings {
        project_id: String,
        /// Topic of a meeting to schedule
        #[arg(long)]
        add: Option<String>,
        #[arg(long, requires = "add")]
        location: Option<String>,
        #[arg(long, requires = "add")]
        date: Option<String>,
    },
    /// List a task's comments, or add one
    Comments {
        task_id: String,
        #[arg(long)]
        add: Option<String>,
    },
    /// Show notifications
    Notifications {
        /// Mark a notification as read
        #[arg(long)]
        read: Option<String>,
    },
    /// Show a project's activity log
    Activity { project_id: String },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProjectsCommands {
    /// List your projects
    List,
    /// Create a project
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Cover image URL
        #[arg(long)]
        img: Option<String>,
    },
    /// Star or unstar a project
    Fav { project_id: String },
    /// Delete a project
    Delete {
        project_id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum TaskCommands {
    /// Add a task to a project
    Add {
        project_id: String,
        name: String,
        #[arg(long)]
        detail: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Show one task
    Show { project_id: String, task_id: String },
    /// Edit a task's name, detail or due date
    Edit {
        project_id: String,
        task_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        detail: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Set a task's status directly
    Status { task_id: String, column: Column },
    /// Add members to a task
    Assign {
        task_id: String,
        #[arg(required = true)]
        members: Vec<String>,
    },
    /// Remove members from a task
    Unassign {
        task_id: String,
        #[arg(required = true)]
        members: Vec<String>,
    },
    /// Delete a task
    Delete {
        task_id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default taskboard.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = TaskboardConfig::with_cli_args(cli.config.as_deref(), cli.api_url.clone(), cli.verbose)?;
    let _log_guard = logging::init(&LogOptions {
        verbose: cli.verbose,
        json: config.json_logs(),
        dir: config.log_dir(),
    })?;
    let ctx = cmd::Ctx::new(config)?;

    match cli.command {
        Commands::Login { email, password } => cmd::cmd_login(&ctx, email, password).await?,
        Commands::Logout => cmd::cmd_logout(&ctx)?,
        Commands::Register {
            email,
            username,
            first_name,
            surname,
            password,
        } => {
            let args = cmd::account::RegisterArgs {
                email,
                username,
                first_name,
                surname,
                password,
            };
            cmd::cmd_register(&ctx, args).await?
        }
        Commands::Passwd => cmd::cmd_passwd(&ctx).await?,
        Commands::Whoami { refresh } => cmd::cmd_whoami(&ctx, refresh).await?,
        Commands::Profile {
            name,
            lastname,
            username,
            img,
        } => {
            let args = cmd::account::ProfileArgs {
                name,
                lastname,
                username,
                img,
            };
            cmd::cmd_profile(&ctx, args).await?
        }
        Commands::Projects { command } => cmd::cmd_projects(&ctx, command).await?,
        Commands::Board { project_id, json } => cmd::cmd_board(&ctx, &project_id, json).await?,
        Commands::Move {
            project_id,
            task_id,
            column,
            index,
        } => cmd::cmd_move(&ctx, &project_id, &task_id, column, index).await?,
        Commands::Task { command } => cmd::cmd_task(&ctx, command).await?,
        Commands::Members {
            project_id,
            invite,
            role,
        } => cmd::cmd_members(&ctx, &project_id, invite, role).await?,
        Commands::Meetings {
            project_id,
            add,
            location,
            date,
        } => {
            let add = add.map(|topic| cmd::team::NewMeetingArgs {
                topic,
                location,
                date,
            });
            cmd::cmd_meetings(&ctx, &project_id, add).await?
        }
        Commands::Comments { task_id, add } => cmd::cmd_comments(&ctx, &task_id, add).await?,
        Commands::Notifications { read } => cmd::cmd_notifications(&ctx, read).await?,
        Commands::Activity { project_id } => cmd::cmd_activity(&ctx, &project_id).await?,
        Commands::Config { command } => cmd::cmd_config(&ctx, command)?,
    }

    Ok(())
}
