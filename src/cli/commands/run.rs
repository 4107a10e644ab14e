//! Run command - Build and launch a playbook
//!
//! The process exit code of this command is the exit code of the launched tool.

use super::CommandContext;
use crate::cli::TargetArgs;
use ansible_launch::launcher::{Launcher, ProcessLauncher};
use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tracing::info;

/// Arguments for the run command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        self.execute_with(ctx, &ProcessLauncher::new()).await
    }

    /// Execute the run command with a specific launcher
    pub async fn execute_with(
        &self,
        ctx: &mut CommandContext,
        launcher: &dyn Launcher,
    ) -> Result<i32> {
        let start_time = Instant::now();

        let overlay = ctx.overlay_vars(Some(&self.target))?;
        let expander = ctx.expander(&overlay);
        let prepared = ctx.invocation(&self.target, &overlay)?.prepare(&expander)?;

        ctx.output.info(&format!("Running playbook '{}'", prepared.playbook));
        ctx.output.debug(&format!("Command: {}", prepared.command));
        ctx.output.flush();

        let code = launcher.launch(&prepared.command, &prepared.options).await?;

        info!(
            playbook = %prepared.playbook,
            exit_code = code,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Playbook finished"
        );

        if code != 0 {
            ctx.output.warning(&format!(
                "{} exited with code {}",
                prepared.command.program(),
                code
            ));
        }

        Ok(code)
    }
}
