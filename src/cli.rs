//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{AspectId, EmployeeId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// feedback-dash - terminal dashboard for employee feedback analysis
///
/// Manage the aspect catalog, inspect an employee's reviews and summaries,
/// and trigger a fresh analysis on the feedback backend.
///
/// Examples:
///   feedback-dash aspects list
///   feedback-dash aspects add "Leadership"
///   feedback-dash employee 42 --format json
///   feedback-dash analyze 42
///   feedback-dash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .feedback-dash.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the feedback backend API
    #[arg(long, value_name = "URL", env = "FEEDBACK_DASH_URL", global = true)]
    pub backend_url: Option<String>,

    /// Request timeout in seconds
    ///
    /// Requests wait indefinitely unless this or the config file sets a limit.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .feedback-dash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Manage the shared aspect catalog
    Aspects {
        #[command(subcommand)]
        action: AspectAction,
    },
    /// Load and show one employee's dashboard
    Employee {
        #[arg(value_name = "ID")]
        id: EmployeeId,
    },
    /// Run a new analysis for an employee, then show the refreshed dashboard
    Analyze {
        #[arg(value_name = "ID")]
        id: EmployeeId,
    },
    /// List employees with their review counts
    Employees,
    /// Show an employee's psychotype profile
    Psychotype {
        #[arg(value_name = "ID")]
        id: EmployeeId,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum AspectAction {
    /// List every aspect
    List,
    /// Add an aspect to the catalog
    Add {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Remove an aspect by id
    Remove {
        #[arg(value_name = "ID")]
        id: AspectId,
    },
}

/// Output format for the dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("No command given. Run with --help to see the commands".to_string());
        }

        if let Some(ref url) = self.backend_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Backend URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
