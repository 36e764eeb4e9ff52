//! `serf join` - tell the agent to join an existing cluster.

use std::io::Write;

use anyhow::Result;
use clap::Parser;

use super::SubCommand;
use super::shared::parse_args;
use crate::agent::AgentClient;

#[derive(Parser, Debug)]
#[command(name = "join", no_binary_name = true, about = "Tell Serf agent to join cluster")]
struct JoinArgs {
    /// Replay past user events
    #[arg(long)]
    replay: bool,

    /// Address of one or more existing members
    #[arg(value_name = "ADDR", required = true)]
    addrs: Vec<String>,
}

pub struct Join;

impl SubCommand for Join {
    fn name(&self) -> &str {
        "join"
    }

    fn synopsis(&self) -> &str {
        "Tell Serf agent to join cluster"
    }

    fn invoke(
        &self,
        client: &mut dyn AgentClient,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<()> {
        let Some(args) = parse_args::<JoinArgs>(args, out)? else {
            return Ok(());
        };
        let n = client.join(&args.addrs, args.replay)?;
        writeln!(out, "Successfully joined cluster by contacting {n} nodes.")?;
        Ok(())
    }
}
