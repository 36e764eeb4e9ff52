//! Error types shared across the dispatcher, agent client and address helpers.
//!
//! Sub-command bodies return `anyhow::Result`; everything that crosses a
//! module boundary is typed here so callers can match on the failure kind.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by [`crate::cmd::Dispatcher::run`].
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The first token did not name a registered sub-command.
    #[error("unknown sub command '{name}' for serf, usage: serf [{}]", .tried.join(","))]
    UnknownSubCommand { name: String, tried: Vec<String> },

    /// The agent was unreachable or rejected the handshake / auth token.
    #[error("error connecting to Serf agent at '{address}': {source}")]
    Connection {
        address: String,
        #[source]
        source: AgentError,
    },

    /// The sub-command itself failed after a successful connect.
    #[error("serf command against '{address}' failed: {source}")]
    CommandExecution {
        address: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("unable to write output: {0}")]
    Output(#[from] io::Error),
}

/// Raised while freezing a [`crate::cmd::CommandTable`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("sub command '{name}' registered more than once")]
    DuplicateSubCommand { name: String },
}

/// Local address discovery failures.
#[derive(Error, Debug)]
pub enum AddrError {
    #[error("no private (RFC 1918) address found on any network interface")]
    NoPrivateAddressFound,

    #[error("unable to enumerate network interfaces: {0}")]
    InterfaceEnumeration(#[from] io::Error),
}

/// Errors from the Serf RPC client.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The agent answered with a non-empty `Error` header.
    #[error("{command}: {message}")]
    Rpc { command: String, message: String },

    /// Sequence number in the response did not match the request.
    #[error("{command}: response sequence {got} does not match request {expected}")]
    SeqMismatch {
        command: String,
        expected: u64,
        got: u64,
    },

    #[error("client connection is closed")]
    Closed,
}

/// Configuration file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result alias used by the agent client.
pub type AgentResult<T> = Result<T, AgentError>;
