//! Command line construction.
//!
//! [`ArgumentBuilder`] turns a configuration, a playbook name and caller
//! parameters into the argument vector of one `ansible-playbook` run:
//!
//! ```text
//! <program> [-<verbose>] [-i <inventory>] <file> [--extra-vars "k1=v1 k2=v2"]
//! ```
//!
//! Verbosity and inventory come from the playbook when it sets them and
//! from the global section otherwise; when neither does, the flag is left
//! out. Every token is a separate argument and is never re-split by a shell.

use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};
use crate::params::{CallerParameters, Substitutor};
use crate::playbook::{non_empty, GlobalConfig, Playbook};
use crate::resolver::resolve;

/// Program invoked when none is configured.
pub const DEFAULT_PROGRAM: &str = "ansible-playbook";

/// Flag preceding the inventory path.
pub const INVENTORY_FLAG: &str = "-i";

/// Flag preceding the combined extra variables.
pub const EXTRA_VARS_FLAG: &str = "--extra-vars";

/// Verbosity token in effect for `playbook`.
pub fn resolve_verbose<'a>(config: &'a GlobalConfig, playbook: &'a Playbook) -> Option<&'a str> {
    non_empty(&playbook.verbose).or_else(|| non_empty(&config.verbose))
}

/// Inventory path in effect for `playbook`.
pub fn resolve_inventory<'a>(config: &'a GlobalConfig, playbook: &'a Playbook) -> Option<&'a str> {
    non_empty(&playbook.inventory).or_else(|| non_empty(&config.inventory))
}

/// An ordered argument vector whose first token is the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Starts a command line with only the program token.
    pub fn from_program(program: impl Into<String>) -> Self {
        Self {
            tokens: vec![program.into()],
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, token: impl Into<String>) -> Self {
        self.push(token);
        self
    }

    fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// The program token.
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// Every token after the program.
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// All tokens, program first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Consumes the command line and returns its tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl fmt::Display for CommandLine {
    /// Shell-quoted rendering, for display only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::join(&self.tokens))
    }
}

/// Builds command lines for a fixed program.
#[derive(Debug, Clone)]
pub struct ArgumentBuilder {
    program: String,
}

impl Default for ArgumentBuilder {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }
}

impl ArgumentBuilder {
    /// Creates a builder for `ansible-playbook`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses another program token (a wrapper script, an absolute path, ...).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The program token.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Builds the command line for the playbook named `name`.
    ///
    /// # Errors
    ///
    /// Any resolution error aborts the build; no partial command line is
    /// returned. See [`resolve`] and [`Substitutor::new`], plus
    /// [`Error::Configuration`] when the selected playbook has no file.
    pub fn build(
        &self,
        config: &GlobalConfig,
        name: &str,
        params: &CallerParameters,
    ) -> Result<CommandLine> {
        let playbook = resolve(config, name)?;
        let mut command = CommandLine::from_program(self.program.as_str());

        if let Some(verbose) = resolve_verbose(config, playbook) {
            command.push(format!("-{}", verbose));
        }

        if let Some(inventory) = resolve_inventory(config, playbook) {
            command.push(INVENTORY_FLAG);
            command.push(inventory);
        }

        let file = playbook.file().ok_or_else(|| {
            Error::configuration(format!("playbook '{}' has no file", name))
        })?;
        command.push(file);

        if let Some(extra_vars) = extra_vars(playbook, params)? {
            command.push(EXTRA_VARS_FLAG);
            command.push(extra_vars);
        }

        Ok(command)
    }
}

/// Builds a command line for `ansible-playbook` from a raw parameter string.
pub fn build(config: &GlobalConfig, name: &str, parameters: &str) -> Result<CommandLine> {
    ArgumentBuilder::new().build(config, name, &CallerParameters::parse(parameters))
}

/// Space-separated `key=value` pairs for the playbook's non-null variables.
fn extra_vars(playbook: &Playbook, params: &CallerParameters) -> Result<Option<String>> {
    let vars: Vec<(&str, &str)> = playbook
        .vars
        .iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (key.as_str(), value)))
        .collect();

    if vars.is_empty() {
        return Ok(None);
    }

    let substitutor = Substitutor::new(params, playbook)?;
    let pairs: Vec<String> = vars
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, substitutor.apply(value)))
        .collect();

    Ok(Some(pairs.join(" ")))
}
