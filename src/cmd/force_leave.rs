//! `serf force-leave` - mark a failed node as left.

use std::io::Write;

use anyhow::Result;
use clap::Parser;

use super::SubCommand;
use super::shared::parse_args;
use crate::agent::AgentClient;

#[derive(Parser, Debug)]
#[command(
    name = "force-leave",
    no_binary_name = true,
    about = "Forces a member of a Serf cluster to enter the \"left\" state"
)]
struct ForceLeaveArgs {
    /// Also remove the node from the member list entirely
    #[arg(long)]
    prune: bool,

    /// Name of the failed node
    #[arg(value_name = "NODE")]
    node: String,
}

pub struct ForceLeave;

impl SubCommand for ForceLeave {
    fn name(&self) -> &str {
        "force-leave"
    }

    fn synopsis(&self) -> &str {
        "Forces a member of a Serf cluster to enter the \"left\" state"
    }

    fn invoke(
        &self,
        client: &mut dyn AgentClient,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<()> {
        let Some(args) = parse_args::<ForceLeaveArgs>(args, out)? else {
            return Ok(());
        };
        client.force_leave(&args.node, args.prune)?;
        tracing::info!(node = %args.node, prune = args.prune, "force-leave sent");
        Ok(())
    }
}
