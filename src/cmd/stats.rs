//! `serf stats` - debugging counters reported by the agent.

use std::io::Write;

use anyhow::Result;
use clap::Parser;

use super::SubCommand;
use super::format::{Role, StyleOptions, color, columns};
use super::shared::parse_args;
use crate::agent::AgentClient;

#[derive(Parser, Debug)]
#[command(name = "stats", no_binary_name = true, about = "Provides debugging information for operators")]
struct StatsArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub struct Stats {
    style: StyleOptions,
}

impl Stats {
    pub fn new(style: StyleOptions) -> Self {
        Stats { style }
    }
}

impl SubCommand for Stats {
    fn name(&self) -> &str {
        "stats"
    }

    fn synopsis(&self) -> &str {
        "Provides debugging information for operators"
    }

    fn invoke(
        &self,
        client: &mut dyn AgentClient,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<()> {
        let Some(args) = parse_args::<StatsArgs>(args, out)? else {
            return Ok(());
        };
        let stats = client.stats()?;

        if args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            return Ok(());
        }

        for (section, values) in &stats {
            writeln!(out, "{}", color(Role::Accent, format!("{section}:"), &self.style))?;
            let rows: Vec<Vec<String>> = values
                .iter()
                .map(|(k, v)| vec![format!("\t{k}"), "=".to_string(), v.clone()])
                .collect();
            for line in columns(&rows) {
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }
}
