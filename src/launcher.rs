//! Running the resolved command.
//!
//! An [`Invocation`] ties the pieces together the way a CI build step does:
//! expand the raw inputs, load the configuration document, build the command
//! line and hand it to a [`Launcher`]. The launcher owns process creation;
//! the rest of the crate only produces argument vectors.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::command::{ArgumentBuilder, CommandLine};
use crate::error::{Error, Result};
use crate::expand::Expander;
use crate::params::CallerParameters;
use crate::playbook::GlobalConfig;

/// Process settings for one launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Working directory; the current one when unset
    pub cwd: Option<PathBuf>,
    /// Variables added to the inherited environment
    pub env: IndexMap<String, String>,
}

impl LaunchOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Adds an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Starts the external tool and waits for it.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Runs `command` and returns its exit code.
    async fn launch(&self, command: &CommandLine, options: &LaunchOptions) -> Result<i32>;
}

/// Launcher that spawns a child process.
///
/// Arguments are passed as an argument vector, never through a shell. The
/// child inherits stdout and stderr, so the tool's output streams straight
/// to the caller's terminal or build log. A child killed by a signal
/// reports `-1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    /// Creates a process launcher.
    pub fn new() -> Self {
        Self
    }

    fn build_command(command: &CommandLine, options: &LaunchOptions) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args());

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        cmd
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, command: &CommandLine, options: &LaunchOptions) -> Result<i32> {
        info!(program = %command.program(), cwd = ?options.cwd, "Launching");
        debug!(command = %command, "Command line");

        let status = Self::build_command(command, options)
            .status()
            .await
            .map_err(|e| Error::launch(command.program(), e.to_string()))?;

        let code = status.code().unwrap_or(-1);
        debug!(exit_code = code, "Process finished");
        Ok(code)
    }
}

/// Launcher that records command lines instead of running them.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    exit_code: i32,
    calls: Mutex<Vec<(CommandLine, LaunchOptions)>>,
}

impl RecordingLauncher {
    /// Creates a recorder that reports `exit_code` for every launch.
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Launches recorded so far.
    pub async fn calls(&self) -> Vec<(CommandLine, LaunchOptions)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn launch(&self, command: &CommandLine, options: &LaunchOptions) -> Result<i32> {
        self.calls
            .lock()
            .await
            .push((command.clone(), options.clone()));
        Ok(self.exit_code)
    }
}

/// A resolved command ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInvocation {
    /// Playbook name after expansion
    pub playbook: String,
    /// Command line to run
    pub command: CommandLine,
    /// Process settings
    pub options: LaunchOptions,
}

/// One requested playbook run, before expansion.
#[derive(Debug, Clone)]
pub struct Invocation {
    configuration_file: String,
    playbook_name: String,
    parameters: String,
    workspace: Option<String>,
    env: IndexMap<String, String>,
    builder: ArgumentBuilder,
}

impl Invocation {
    /// Creates an invocation of `playbook_name` from `configuration_file`.
    pub fn new(configuration_file: impl Into<String>, playbook_name: impl Into<String>) -> Self {
        Self {
            configuration_file: configuration_file.into(),
            playbook_name: playbook_name.into(),
            parameters: String::new(),
            workspace: None,
            env: IndexMap::new(),
            builder: ArgumentBuilder::new(),
        }
    }

    /// Sets the raw caller parameters (`key=value,...`).
    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = parameters.into();
        self
    }

    /// Sets the working directory of the launched tool.
    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// Adds variables passed to the launched tool's environment.
    pub fn with_env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(env.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Uses a custom argument builder.
    pub fn with_builder(mut self, builder: ArgumentBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Expands the inputs, loads the configuration and builds the command.
    ///
    /// The configuration path, playbook name, parameters, workspace and
    /// variable values are expanded; playbook files and inventories are not.
    pub fn prepare(&self, expander: &dyn Expander) -> Result<PreparedInvocation> {
        let configuration_file = expander.expand(&self.configuration_file);
        let config = GlobalConfig::from_file(&configuration_file)?.expand_vars(expander);

        let playbook = expander.expand(&self.playbook_name);
        let parameters = CallerParameters::parse(&expander.expand(&self.parameters));

        let command = self.builder.build(&config, &playbook, &parameters)?;
        info!(playbook = %playbook, config = %configuration_file, "Resolved playbook");

        let cwd = self
            .workspace
            .as_deref()
            .filter(|w| !w.is_empty())
            .map(|w| PathBuf::from(expander.expand(w)));

        Ok(PreparedInvocation {
            playbook,
            command,
            options: LaunchOptions {
                cwd,
                env: self.env.clone(),
            },
        })
    }

    /// Prepares the invocation and runs it with `launcher`.
    pub async fn execute(&self, expander: &dyn Expander, launcher: &dyn Launcher) -> Result<i32> {
        let prepared = self.prepare(expander)?;
        launcher.launch(&prepared.command, &prepared.options).await
    }
}
