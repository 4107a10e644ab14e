//! List command - Show the playbooks of a configuration document

use super::CommandContext;
use crate::cli::ConfigArgs;
use anyhow::Result;
use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let document = ctx.load_document(&self.config)?;

        let mut rows = Vec::with_capacity(document.playbooks.len());
        for (index, playbook) in document.playbooks.iter().enumerate() {
            match playbook.name() {
                Some(name) => rows.push(vec![
                    name.to_string(),
                    playbook.file().unwrap_or("").to_string(),
                ]),
                None => ctx
                    .output
                    .warning(&format!("playbook #{} has no name", index + 1)),
            }
        }

        ctx.output.table(&["NAME", "FILE"], &rows);
        Ok(0)
    }
}
