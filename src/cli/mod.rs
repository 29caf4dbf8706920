//! Command-line interface for the hscript compiler.
//!
//! # Available Commands
//!
//! - `compile` - Compile hscript documents into build-engine scripts
//! - `check` - Validate documents and summarise what they declare
//! - `clean` - Remove generated scripts and restore hand-written ones
//!
//! # Basic Workflow
//!
//! ```bash
//! # Generate pkg/wscript from pkg/hscript.yml
//! hscript compile pkg
//!
//! # Every package under the work area, normalized documents on stdout
//! hscript compile --recursive --format hscript --stdout .
//!
//! # Validate without writing anything
//! hscript check --recursive --json .
//!
//! # Undo: delete generated scripts, put hand-written ones back
//! hscript clean --recursive .
//! ```
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - errors only
//! - `--config` / `-c` - configuration file instead of `~/.hscript/config.toml`
//!
//! `RUST_LOG`, when set, overrides the level chosen by these flags.

mod check;
mod clean;
mod compile;

use crate::config::GenConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing when a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .try_init();
    }
}

/// Compile hscript package descriptions into build-engine scripts.
#[derive(Parser)]
#[command(
    name = "hscript",
    about = "Compile hscript package descriptions into build-engine scripts",
    version,
    long_about = "hscript reads the declarative hscript.yml of each package and generates the \
                  wscript consumed by the build engine, backing up any hand-written script first."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    ///
    /// Defaults to `~/.hscript/config.toml`. A missing file means defaults.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile documents into build-engine scripts
    Compile(compile::CompileCommand),

    /// Validate documents without writing anything
    Check(check::CheckCommand),

    /// Remove generated scripts and restore backups
    Clean(clean::CleanCommand),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an already-built [`CliConfig`].
    ///
    /// Loads [`GenConfig`] and hands it to the command; nothing is read from
    /// or written to the process environment.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let gen_config = GenConfig::load_with_optional(config.config_path.clone()).await?;
        tracing::debug!("using {gen_config:?}");

        match self.command {
            Commands::Compile(cmd) => cmd.execute(&gen_config).await,
            Commands::Check(cmd) => cmd.execute(&gen_config).await,
            Commands::Clean(cmd) => cmd.execute(&gen_config).await,
        }
    }
}
