//! Configuration view and setup: `taskboard config`.

use anyhow::Result;

use taskboard::config::TaskboardToml;

use super::super::ConfigCommands;
use super::Ctx;

pub fn cmd_config(ctx: &Ctx, command: Option<ConfigCommands>) -> Result<()> {
    let config = &ctx.config;
    let config_path = &config.config_path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Taskboard Configuration");
            println!("=======================");
            println!();
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No taskboard.toml at {} (using defaults)", config_path.display());
            }
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  api.url = \"{}\"", config.api_url());
            println!("  api.timeout_secs = {}", config.timeout().as_secs());
            println!("  board.reload_policy = \"{}\"", config.reload_policy());
            println!("  session.path = \"{}\"", config.session_path().display());
            match config.log_dir() {
                Some(dir) => println!("  logging.dir = \"{}\"", dir.display()),
                None => println!("  logging.dir = (stderr only)"),
            }
            println!("  logging.json = {}", config.json_logs());
            println!();

            let warnings = config.validate();
            if !warnings.is_empty() {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("taskboard.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }
            TaskboardToml::default().save(config_path)?;
            println!("Created taskboard.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] url, timeout_secs");
            println!("  - [board] reload_policy");
            println!("  - [session] path");
            println!("  - [logging] dir, json");
            println!();
        }
    }

    Ok(())
}
