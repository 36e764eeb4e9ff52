//! `serf [command] [args...]` entry point.
//!
//! Single pass: parse -> lookup -> connect -> invoke -> close. No retries.

use std::io::Write;

use super::help;
use super::registry::CommandTable;
use crate::agent::{AgentClient, Connector};
use crate::config::ConnectionConfig;
use crate::error::DispatchError;
use crate::net;

/// Routes the first argument to a registered sub-command.
pub struct Dispatcher<C: Connector> {
    table: CommandTable,
    config: ConnectionConfig,
    connector: C,
    executable: String,
}

/// Closes the wrapped client on every exit path, panics included.
struct ClientGuard<'a> {
    client: Box<dyn AgentClient>,
    address: &'a str,
}

impl ClientGuard<'_> {
    fn client(&mut self) -> &mut dyn AgentClient {
        self.client.as_mut()
    }
}

impl Drop for ClientGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.client.close() {
            tracing::warn!(address = self.address, error = %e, "failed to close agent connection");
        }
    }
}

impl<C: Connector> Dispatcher<C> {
    pub fn new(
        table: CommandTable,
        config: ConnectionConfig,
        connector: C,
        executable: impl Into<String>,
    ) -> Self {
        Dispatcher {
            table,
            config,
            connector,
            executable: executable.into(),
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Usage text listing every registered sub-command.
    pub fn help(&self) -> String {
        help::render(&self.executable, &self.table)
    }

    /// `serf commands [a,b,c]`
    pub fn synopsis(&self) -> String {
        help::synopsis(&self.table)
    }

    /// Run one invocation. With no arguments the help text goes to `out`.
    pub fn run(&self, args: &[String], out: &mut dyn Write) -> Result<(), DispatchError> {
        let Some((name, rest)) = args.split_first() else {
            writeln!(out, "{}", self.help())?;
            return Ok(());
        };

        let Some(handler) = self.table.lookup(name) else {
            return Err(DispatchError::UnknownSubCommand {
                name: name.clone(),
                tried: self.table.names(),
            });
        };

        let address = net::to_connectable(&self.config.address);
        tracing::info!(command = %name, address = %address, "connecting to serf agent");
        let client = self
            .connector
            .connect(&address, &self.config.auth_token)
            .map_err(|source| DispatchError::Connection {
                address: address.clone(),
                source,
            })?;

        let mut guard = ClientGuard {
            client,
            address: &address,
        };
        let result = handler.invoke(guard.client(), rest, out);
        drop(guard);

        result.map_err(|source| DispatchError::CommandExecution {
            address: address.clone(),
            source,
        })?;
        tracing::debug!(command = %name, "sub command finished");
        Ok(())
    }
}
