//! Test doubles for sub-commands and the agent connection.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::SubCommand;
use crate::agent::protocol::{Member, Stats};
use crate::agent::{AgentClient, Connector};
use crate::error::{AgentError, AgentResult};

/// Sub-command that echoes its arguments, or fails when asked to.
pub struct Named {
    name: String,
    synopsis: String,
    fail: bool,
}

impl Named {
    pub fn new(name: &str) -> Self {
        Named {
            name: name.to_string(),
            synopsis: format!("{name} synopsis"),
            fail: false,
        }
    }

    pub fn failing(name: &str) -> Self {
        Named {
            fail: true,
            ..Named::new(name)
        }
    }
}

impl SubCommand for Named {
    fn name(&self) -> &str {
        &self.name
    }

    fn synopsis(&self) -> &str {
        &self.synopsis
    }

    fn invoke(
        &self,
        _client: &mut dyn AgentClient,
        args: &[String],
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("{} failed", self.name);
        }
        writeln!(out, "{} invoked with [{}]", self.name, args.join(" "))?;
        Ok(())
    }
}

/// Everything a `FakeAgent` was asked to do.
#[derive(Debug, Default)]
pub struct Calls {
    pub connects: Vec<(String, String)>,
    pub closes: usize,
    pub joined: Vec<(Vec<String>, bool)>,
    pub left: usize,
    pub force_left: Vec<(String, bool)>,
    pub events: Vec<(String, Vec<u8>, bool)>,
}

/// Scripted agent state shared between a connector and its clients.
#[derive(Debug, Default)]
pub struct FakeState {
    pub members: Vec<Member>,
    pub stats: Stats,
    pub refuse: bool,
    pub calls: Calls,
}

#[derive(Clone, Default)]
pub struct FakeConnector {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn refusing() -> Self {
        let c = FakeConnector::default();
        c.state.lock().unwrap().refuse = true;
        c
    }

    pub fn with_members(members: Vec<Member>) -> Self {
        let c = FakeConnector::default();
        c.state.lock().unwrap().members = members;
        c
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().calls.connects.len()
    }

    pub fn closes(&self) -> usize {
        self.state.lock().unwrap().calls.closes
    }

    pub fn last_connect(&self) -> Option<(String, String)> {
        self.state.lock().unwrap().calls.connects.last().cloned()
    }

    /// A connected client without going through `connect`.
    pub fn client(&self) -> FakeAgent {
        FakeAgent {
            state: Arc::clone(&self.state),
            open: true,
        }
    }
}

impl Connector for FakeConnector {
    fn connect(&self, address: &str, auth_token: &str) -> AgentResult<Box<dyn AgentClient>> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .connects
            .push((address.to_string(), auth_token.to_string()));
        if state.refuse {
            return Err(AgentError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(Box::new(self.client()))
    }
}

pub struct FakeAgent {
    state: Arc<Mutex<FakeState>>,
    open: bool,
}

impl FakeAgent {
    fn check(&self) -> AgentResult<std::sync::MutexGuard<'_, FakeState>> {
        if !self.open {
            return Err(AgentError::Closed);
        }
        Ok(self.state.lock().unwrap())
    }
}

impl AgentClient for FakeAgent {
    fn members(&mut self) -> AgentResult<Vec<Member>> {
        Ok(self.check()?.members.clone())
    }

    fn join(&mut self, addrs: &[String], replay: bool) -> AgentResult<usize> {
        self.check()?.calls.joined.push((addrs.to_vec(), replay));
        Ok(addrs.len())
    }

    fn leave(&mut self) -> AgentResult<()> {
        self.check()?.calls.left += 1;
        Ok(())
    }

    fn force_leave(&mut self, node: &str, prune: bool) -> AgentResult<()> {
        self.check()?.calls.force_left.push((node.to_string(), prune));
        Ok(())
    }

    fn user_event(&mut self, name: &str, payload: &[u8], coalesce: bool) -> AgentResult<()> {
        self.check()?
            .calls
            .events
            .push((name.to_string(), payload.to_vec(), coalesce));
        Ok(())
    }

    fn stats(&mut self) -> AgentResult<Stats> {
        Ok(self.check()?.stats.clone())
    }

    fn close(&mut self) -> AgentResult<()> {
        if self.open {
            self.open = false;
            self.state.lock().unwrap().calls.closes += 1;
        }
        Ok(())
    }
}
