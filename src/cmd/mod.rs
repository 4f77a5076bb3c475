//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                                          |
//! |------------|-----------------------------------------------------------|
//! | `account`  | `Login`, `Logout`, `Register`, `Passwd`, `Whoami`, `Profile` |
//! | `projects` | `Projects`                                                |
//! | `board`    | `Board`, `Move`                                           |
//! | `task`     | `Task`                                                    |
//! | `team`     | `Members`, `Meetings`, `Comments`                         |
//! | `inbox`    | `Notifications`, `Activity`                               |
//! | `config`   | `Config`                                                  |

pub mod account;
pub mod board;
pub mod config;
pub mod inbox;
pub mod projects;
pub mod task;
pub mod team;

pub use account::{cmd_login, cmd_logout, cmd_passwd, cmd_profile, cmd_register, cmd_whoami};
pub use board::{cmd_board, cmd_move};
pub use config::cmd_config;
pub use inbox::{cmd_activity, cmd_notifications};
pub use projects::cmd_projects;
pub use task::cmd_task;
pub use team::{cmd_comments, cmd_meetings, cmd_members};

use anyhow::{Context, Result};
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use tracing::info;

use taskboard::config::TaskboardConfig;
use taskboard::errors::GatewayError;
use taskboard::gateway::HttpGateway;
use taskboard::session::SessionStore;
use taskboard_common::Session;

/// What every command needs: resolved config, an HTTP client and the
/// session file.
pub struct Ctx {
    pub config: TaskboardConfig,
    pub gateway: HttpGateway,
    pub sessions: SessionStore,
}

impl Ctx {
    pub fn new(config: TaskboardConfig) -> Result<Self> {
        let gateway = HttpGateway::new(&config.api_url(), config.timeout())?;
        let sessions = SessionStore::new(config.session_path());
        Ok(Self {
            config,
            gateway,
            sessions,
        })
    }

    /// The signed-in session, or an error telling the user to log in.
    pub fn session(&self) -> Result<Session> {
        Ok(self.sessions.require()?)
    }

    /// Turn a failed backend call into a CLI error. A rejected session is
    /// forgotten so the next command asks for a fresh login.
    pub fn backend_error(&self, err: GatewayError) -> anyhow::Error {
        if err.is_unauthorized() {
            self.expire_session();
            return anyhow::anyhow!("Session expired. Run `taskboard login` to sign in again");
        }
        anyhow::Error::new(err)
    }

    pub fn expire_session(&self) {
        info!("clearing rejected session");
        if let Err(e) = self.sessions.clear() {
            tracing::warn!(error = %e, "failed to clear session file");
        }
    }
}

/// Ask before a destructive action, unless `--yes` was given.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

/// Print field errors from a rejected form, one per line.
pub fn report_invalid(err: &taskboard_common::ValidationError) -> anyhow::Error {
    for (field, message) in err.fields() {
        eprintln!("  {} {}", console::style(format!("{}:", field)).red(), message);
    }
    anyhow::anyhow!("Invalid input: {}", err)
}
