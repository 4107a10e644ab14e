//! Export command - Print global properties as KEY=VALUE definitions
//!
//! Properties whose name is already set in the environment are left out,
//! so the output can be sourced without clobbering existing values.

use super::CommandContext;
use crate::cli::ConfigArgs;
use ansible_launch::extend::properties_for;
use anyhow::Result;
use clap::Parser;

/// Arguments for the export command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Comma-separated property names
    #[arg(required = true)]
    pub names: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let document = ctx.load_document(&self.config)?;
        let exported = properties_for(&document, &self.names, |name| {
            std::env::var_os(name).is_some()
        });

        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!(exported));
        } else {
            for (key, value) in &exported {
                ctx.output.line(&format!("{}={}", key, value));
            }
        }

        Ok(0)
    }
}
