use std::path::{Path, PathBuf};

mod admin;
mod listing;
mod prompt;
mod session;
mod student;
mod teacher;
mod terminal;

use clap::ArgAction;
use incident::{Config, SecurityManager};
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = "incident.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.unwrap_or_default().run(&self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, Default, clap::Parser)]
pub enum Command {
    /// Log in and work through the role menus (default)
    ///
    /// The session runs against a demo school; nothing is saved when it
    /// ends.
    #[default]
    Session,

    /// List the reports of the demo school
    Reports(listing::Reports),

    /// Print the digest of a password, for provisioning accounts
    HashPassword(HashPassword),

    /// Apply the description transform to a piece of text
    Encode(Transform),

    /// Reverse the description transform
    Decode(Transform),

    /// Write a default configuration file
    Init(Init),
}

impl Command {
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Session => {
                let config = load_config(config_path)?;
                session::run(config)?;
            }
            Self::Reports(command) => {
                let school = incident::storage::seed::demo_school(load_config(config_path)?);
                command.run(&school)?;
            }
            Self::HashPassword(command) => command.run()?,
            Self::Encode(command) => command.encode(),
            Self::Decode(command) => command.decode()?,
            Self::Init(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

/// Load the configuration, falling back to the defaults if the file does not
/// exist.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    Config::load(path).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
}

#[derive(Debug, clap::Parser)]
pub struct HashPassword {
    /// The password to hash. Prompted for (hidden) if omitted.
    password: Option<String>,
}

impl HashPassword {
    fn run(self) -> anyhow::Result<()> {
        let password = match self.password {
            Some(password) => password,
            None => dialoguer::Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?,
        };

        println!("{}", incident::domain::hash_password(&password));
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Transform {
    /// The text to transform
    text: String,
}

impl Transform {
    fn encode(self) {
        println!("{}", SecurityManager::new().encrypt_data(&self.text));
    }

    fn decode(self) -> anyhow::Result<()> {
        let decoded = SecurityManager::new().decrypt_data(&self.text)?;
        println!("{decoded}");
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

impl Init {
    #[instrument]
    fn run(self, path: &Path) -> anyhow::Result<()> {
        if path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }

        Config::default()
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", path.display()))?;

        println!(
            "{}",
            format!("✅ Wrote default configuration to {}", path.display()).success()
        );
        Ok(())
    }
}
