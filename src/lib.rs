//! serfctl - manage a Serf (gossip) agent from the command line.
//!
//! `serf [command] [args...]` is routed through [`cmd::Dispatcher`], which
//! looks the command up in a sorted [`cmd::CommandTable`], connects to the
//! agent at the configured address and runs the handler.

pub mod agent;
pub mod cmd;
pub mod config;
pub mod error;
pub mod net;
pub mod utils;
