//! Show command - Print the resolved command line without running it

use super::CommandContext;
use crate::cli::TargetArgs;
use anyhow::Result;
use clap::Parser;

/// Arguments for the show command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl ShowArgs {
    /// Execute the show command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let overlay = ctx.overlay_vars(Some(&self.target))?;
        let expander = ctx.expander(&overlay);
        let prepared = ctx.invocation(&self.target, &overlay)?.prepare(&expander)?;

        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({
                "playbook": prepared.playbook,
                "command": prepared.command,
                "cwd": prepared.options.cwd,
            }));
        } else {
            ctx.output.line(&prepared.command.to_string());
        }

        Ok(0)
    }
}
