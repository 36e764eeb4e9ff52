use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use serfctl::agent::SerfConnector;
use serfctl::cmd::{self, Dispatcher, format::StyleOptions, help};
use serfctl::config::{self, Overrides};
use serfctl::{net, utils};

/// serfctl - manage a Serf (gossip) agent over its RPC port
///
/// Layout:
///   serfctl serf                      (list sub-commands)
///   serfctl serf <command> [args...]  (run one against the agent)
///   serfctl local-ip [--json]         (first RFC 1918 address of this host)
///
/// Global flags / env (place them before the command):
///   -v / -vv                  Increase verbosity (RUST_LOG overrides)
///   -q / --quiet              Errors only
///   -c / --config FILE        YAML config (or SERFCTL_CONFIG)
///   --serf-address ADDR       Agent RPC address (or SERF_ADDRESS), default 127.0.0.1:8800
///   --serf-auth-token TOKEN   Agent auth token (or SERF_AUTH_TOKEN)
///
/// Examples:
///   serfctl serf members --status alive
///   serfctl --serf-address 0.0.0.0:7373 serf join 10.0.0.2:7946
///   serfctl serf event deploy v1.2.3
#[derive(Parser, Debug)]
#[command(
    name = "serfctl",
    version,
    author,
    about = "serfctl - management CLI for Serf (gossip) agents",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// YAML config file
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serf agent RPC address
    #[arg(long = "serf-address", global = true, value_name = "ADDR")]
    serf_address: Option<String>,

    /// Serf agent auth token
    #[arg(long = "serf-auth-token", global = true, value_name = "TOKEN")]
    serf_auth_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serf agent management (sub-commands listed when run without arguments)
    Serf(SerfArgs),

    /// Print the first private (RFC 1918) address of this host
    LocalIp(LocalIpArgs),
}

#[derive(Args, Debug)]
pub struct SerfArgs {
    /// Sub-command name followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct LocalIpArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let table = cmd::builtin(StyleOptions::detect()).build()?;

    // `serf` advertises the registered sub-commands in its one-line about.
    let matches = Cli::command()
        .mut_subcommand("serf", |c| c.about(help::synopsis(&table)))
        .get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    utils::init_logging(utils::derive_level(cli.verbose, cli.quiet));

    match cli.command {
        Commands::Serf(args) => {
            let overrides = Overrides {
                config_file: cli.config,
                address: cli.serf_address,
                auth_token: cli.serf_auth_token,
            };
            let config = config::load(&overrides).context("Failed to load configuration")?;
            let dispatcher = Dispatcher::new(table, config, SerfConnector, executable_name());
            let mut out = io::stdout().lock();
            dispatcher.run(&args.args, &mut out)?;
            Ok(())
        }
        Commands::LocalIp(args) => {
            let ip = net::first_private_interface_address()?;
            if args.json {
                println!("{}", serde_json::json!({ "ip": ip.to_string() }));
            } else {
                println!("{ip}");
            }
            Ok(())
        }
    }
}

/// File name of the running binary, for usage text.
fn executable_name() -> String {
    std::env::args_os()
        .next()
        .map(PathBuf::from)
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "serfctl".to_string())
}
