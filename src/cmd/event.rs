//! `serf event` - dispatch a custom user event through the cluster.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Parser;

use super::SubCommand;
use super::shared::parse_args;
use crate::agent::AgentClient;

#[derive(Parser, Debug)]
#[command(name = "event", no_binary_name = true, about = "Send a custom event through the Serf cluster")]
struct EventArgs {
    /// Deliver every event instead of coalescing same-named ones
    #[arg(long)]
    no_coalesce: bool,

    /// Event name
    #[arg(value_name = "NAME")]
    name: String,

    /// Optional payload sent as raw bytes
    #[arg(value_name = "PAYLOAD")]
    payload: Option<String>,
}

pub struct Event;

impl SubCommand for Event {
    fn name(&self) -> &str {
        "event"
    }

    fn synopsis(&self) -> &str {
        "Send a custom event through the Serf cluster"
    }

    fn invoke(
        &self,
        client: &mut dyn AgentClient,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<()> {
        let Some(args) = parse_args::<EventArgs>(args, out)? else {
            return Ok(());
        };
        if args.name.trim().is_empty() {
            bail!("event name cannot be empty");
        }
        let payload = args.payload.as_deref().unwrap_or("").as_bytes();
        let coalesce = !args.no_coalesce;
        client.user_event(&args.name, payload, coalesce)?;
        writeln!(
            out,
            "Event '{}' dispatched! Coalescing enabled: {coalesce}",
            args.name
        )?;
        Ok(())
    }
}
