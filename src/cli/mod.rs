//! CLI module for ansible-launch
//!
//! This module provides the command-line interface,
//! including argument parsing and subcommand handling.

pub mod commands;
pub mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ansible-launch - resolve and run configured ansible-playbook invocations
///
/// Reads a playbook configuration document, picks a playbook by name and
/// builds its ansible-playbook command line from caller parameters.
#[derive(Parser, Debug, Clone)]
#[command(name = "ansible-launch")]
#[command(version)]
#[command(about = "Resolve and run configured ansible-playbook invocations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the settings file
    #[arg(long, global = true, env = "ANSIBLE_LAUNCH_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build and launch a playbook
    Run(commands::run::RunArgs),

    /// Print the command line a playbook resolves to
    Show(commands::show::ShowArgs),

    /// List the playbooks of a configuration
    List(commands::list::ListArgs),

    /// Print global properties as KEY=VALUE definitions
    Export(commands::export::ExportArgs),
}

/// Location of the playbook configuration document
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Playbook configuration file (falls back to the configured default)
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,
}

/// Playbook selection shared by `run` and `show`
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Name of the playbook to resolve
    #[arg(required = true)]
    pub playbook: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Caller parameters (key=value,key=value)
    #[arg(short = 'p', long, default_value = "")]
    pub parameters: String,

    /// Working directory of the launched tool
    #[arg(short = 'w', long)]
    pub workspace: Option<String>,

    /// Additional expansion variable (KEY=VALUE)
    #[arg(long = "var", action = clap::ArgAction::Append)]
    pub vars: Vec<String>,

    /// File of newline-separated KEY=VALUE expansion variables
    #[arg(long)]
    pub vars_file: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Check if JSON output is requested
    pub fn is_json(&self) -> bool {
        matches!(self.output, OutputFormat::Json)
    }
}
