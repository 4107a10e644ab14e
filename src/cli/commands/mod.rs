//! Subcommands module for the ansible-launch CLI
//!
//! This module contains all the subcommand implementations.

pub mod export;
pub mod list;
pub mod run;
pub mod show;

use crate::cli::output::OutputFormatter;
use crate::cli::{ConfigArgs, TargetArgs};
use ansible_launch::command::ArgumentBuilder;
use ansible_launch::config::Config;
use ansible_launch::expand::{EnvExpander, Expander};
use ansible_launch::extend::parse_variable_lines;
use ansible_launch::launcher::Invocation;
use ansible_launch::playbook::GlobalConfig;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use tracing::debug;

/// Common context shared between commands
pub struct CommandContext {
    /// Tool settings
    pub config: Config,
    /// Output formatter
    pub output: OutputFormatter,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &crate::cli::Cli, config: Config) -> Self {
        let output = OutputFormatter::new(!cli.no_color, cli.is_json(), cli.verbosity());

        Self { config, output }
    }

    /// Path of the playbook configuration document, before expansion
    pub fn configuration_file(&self, args: &ConfigArgs) -> Result<String> {
        match args
            .config
            .as_ref()
            .or(self.config.defaults.configuration_file.as_ref())
        {
            Some(path) => Ok(path.clone()),
            None => bail!(
                "no playbook configuration given; pass --config or set defaults.configuration_file"
            ),
        }
    }

    /// Variables layered over the process environment: settings first, then
    /// `--vars-file`, then each `--var`
    pub fn overlay_vars(&self, target: Option<&TargetArgs>) -> Result<IndexMap<String, String>> {
        let mut vars = self.config.environment.clone();

        if let Some(target) = target {
            if let Some(path) = &target.vars_file {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read vars file: {}", path.display()))?;
                vars.extend(parse_variable_lines(&content));
            }

            vars.extend(parse_variable_lines(&target.vars.join("\n")));
        }

        debug!(count = vars.len(), "Collected expansion variables");
        Ok(vars)
    }

    /// Expander over the process environment and `overlay`
    pub fn expander(&self, overlay: &IndexMap<String, String>) -> EnvExpander {
        let mut expander = EnvExpander::from_env();
        expander.extend(overlay.clone());
        expander
    }

    /// Load the playbook configuration document named by `args`
    pub fn load_document(&self, args: &ConfigArgs) -> Result<GlobalConfig> {
        let overlay = self.overlay_vars(None)?;
        let path = self.expander(&overlay).expand(&self.configuration_file(args)?);
        self.output.debug(&format!("Loading configuration: {}", path));

        Ok(GlobalConfig::from_file(&path)?)
    }

    /// Build the invocation described by `target`
    pub fn invocation(
        &self,
        target: &TargetArgs,
        overlay: &IndexMap<String, String>,
    ) -> Result<Invocation> {
        let builder = ArgumentBuilder::new().with_program(self.config.defaults.program.as_str());
        let configuration_file = self.configuration_file(&target.config)?;

        let mut invocation = Invocation::new(configuration_file, target.playbook.as_str())
            .with_parameters(target.parameters.as_str())
            .with_env(overlay.clone())
            .with_builder(builder);

        if let Some(workspace) = target
            .workspace
            .as_ref()
            .or(self.config.defaults.workspace.as_ref())
        {
            invocation = invocation.with_workspace(workspace.as_str());
        }

        Ok(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn context(config: Config) -> CommandContext {
        let cli = Cli::try_parse_from(["ansible-launch", "list"]).unwrap();
        CommandContext::new(&cli, config)
    }

    fn target(args: &[&str]) -> TargetArgs {
        let mut argv = vec!["ansible-launch", "show"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            crate::cli::Commands::Show(show) => show.target,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_configuration_file_precedence() {
        let mut config = Config::default();
        config.defaults.configuration_file = Some("default.yml".into());
        let ctx = context(config);

        assert_eq!(
            ctx.configuration_file(&ConfigArgs { config: Some("given.yml".into()) }).unwrap(),
            "given.yml"
        );
        assert_eq!(ctx.configuration_file(&ConfigArgs::default()).unwrap(), "default.yml");
    }

    #[test]
    fn test_configuration_file_missing() {
        let ctx = context(Config::default());
        assert!(ctx.configuration_file(&ConfigArgs::default()).is_err());
    }

    #[test]
    fn test_overlay_vars_order() {
        let mut config = Config::default();
        config.environment.insert("A".into(), "settings".into());
        config.environment.insert("B".into(), "settings".into());
        let ctx = context(config);

        let vars = ctx
            .overlay_vars(Some(&target(&["deploy", "--var", "B=cli", "--var", "C=x=y"])))
            .unwrap();

        assert_eq!(vars.get("A").map(String::as_str), Some("settings"));
        assert_eq!(vars.get("B").map(String::as_str), Some("cli"));
        assert_eq!(vars.get("C").map(String::as_str), Some("x=y"));
    }

    #[test]
    fn test_expander_uses_overlay() {
        let ctx = context(Config::default());
        let overlay = IndexMap::from([("LAUNCH_TEST_ONLY".to_string(), "v".to_string())]);
        assert_eq!(ctx.expander(&overlay).expand("${LAUNCH_TEST_ONLY}"), "v");
    }
}
