//! `serf leave` - gracefully leave the cluster and shut the agent down.

use std::io::Write;

use anyhow::Result;
use clap::Parser;

use super::SubCommand;
use super::shared::parse_args;
use crate::agent::AgentClient;

#[derive(Parser, Debug)]
#[command(
    name = "leave",
    no_binary_name = true,
    about = "Gracefully leaves the Serf cluster and shuts down"
)]
struct LeaveArgs {}

pub struct Leave;

impl SubCommand for Leave {
    fn name(&self) -> &str {
        "leave"
    }

    fn synopsis(&self) -> &str {
        "Gracefully leaves the Serf cluster and shuts down"
    }

    fn invoke(
        &self,
        client: &mut dyn AgentClient,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<()> {
        if parse_args::<LeaveArgs>(args, out)?.is_none() {
            return Ok(());
        }
        client.leave()?;
        writeln!(out, "Graceful leave complete")?;
        Ok(())
    }
}
