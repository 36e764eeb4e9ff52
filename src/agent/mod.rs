//! Serf agent client.
//!
//! `Connector::connect(address, auth_token)` -> `Box<dyn AgentClient>`.
//! The shipped `SerfConnector` speaks the agent's msgpack RPC over TCP:
//! header `{Command, Seq}` + optional body out, header `{Seq, Error}` +
//! optional body back. No timeouts and no retries.

pub mod protocol;

use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::net::{Shutdown, TcpStream};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_bytes::ByteBuf;

use crate::error::{AgentError, AgentResult};
use protocol::{
    AUTH, AuthRequest, EVENT, EventRequest, FORCE_LEAVE, ForceLeaveRequest, HANDSHAKE,
    HandshakeRequest, IPC_VERSION, JOIN, JoinRequest, JoinResponse, LEAVE, MEMBERS, Member,
    MembersResponse, RequestHeader, ResponseHeader, STATS, Stats,
};

/// Operations a sub-command can run against a connected agent.
pub trait AgentClient {
    fn members(&mut self) -> AgentResult<Vec<Member>>;

    /// Ask the agent to join the given nodes; returns how many were contacted.
    fn join(&mut self, addrs: &[String], replay: bool) -> AgentResult<usize>;

    fn leave(&mut self) -> AgentResult<()>;

    fn force_leave(&mut self, node: &str, prune: bool) -> AgentResult<()>;

    fn user_event(&mut self, name: &str, payload: &[u8], coalesce: bool) -> AgentResult<()>;

    fn stats(&mut self) -> AgentResult<Stats>;

    /// Release the connection. Calling it again is a no-op.
    fn close(&mut self) -> AgentResult<()>;
}

/// Opens agent connections.
pub trait Connector {
    fn connect(&self, address: &str, auth_token: &str) -> AgentResult<Box<dyn AgentClient>>;
}

/// Connector for a live Serf agent RPC endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerfConnector;

impl Connector for SerfConnector {
    fn connect(&self, address: &str, auth_token: &str) -> AgentResult<Box<dyn AgentClient>> {
        Ok(Box::new(RpcClient::connect(address, auth_token)?))
    }
}

struct Conn {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

/// Synchronous Serf RPC client over a single TCP connection.
pub struct RpcClient {
    address: String,
    conn: Option<Conn>,
    seq: u64,
}

impl RpcClient {
    /// Dial, handshake, and authenticate when `auth_token` is non-empty.
    pub fn connect(address: &str, auth_token: &str) -> AgentResult<Self> {
        let stream = TcpStream::connect(address)?;
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        let writer = BufWriter::new(stream);
        tracing::debug!(address, "tcp connection established");

        let mut client = RpcClient {
            address: address.to_string(),
            conn: Some(Conn { reader, writer }),
            seq: 0,
        };
        client.call(
            HANDSHAKE,
            Some(&HandshakeRequest {
                version: IPC_VERSION,
            }),
        )?;
        if !auth_token.is_empty() {
            client.call(
                AUTH,
                Some(&AuthRequest {
                    auth_key: auth_token.to_string(),
                }),
            )?;
        }
        Ok(client)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn conn(&mut self) -> AgentResult<&mut Conn> {
        self.conn.as_mut().ok_or(AgentError::Closed)
    }

    fn send<B: Serialize>(&mut self, command: &str, body: Option<&B>) -> AgentResult<u64> {
        self.seq += 1;
        let header = RequestHeader {
            command: command.to_string(),
            seq: self.seq,
        };
        let conn = self.conn()?;
        rmp_serde::encode::write_named(&mut conn.writer, &header)?;
        if let Some(body) = body {
            rmp_serde::encode::write_named(&mut conn.writer, body)?;
        }
        conn.writer.flush()?;
        tracing::trace!(command, seq = header.seq, "request sent");
        Ok(header.seq)
    }

    fn recv_header(&mut self, command: &str, expected: u64) -> AgentResult<()> {
        let conn = self.conn()?;
        let header: ResponseHeader = rmp_serde::from_read(&mut conn.reader)?;
        if header.seq != expected {
            return Err(AgentError::SeqMismatch {
                command: command.to_string(),
                expected,
                got: header.seq,
            });
        }
        if !header.error.is_empty() {
            return Err(AgentError::Rpc {
                command: command.to_string(),
                message: header.error,
            });
        }
        Ok(())
    }

    /// Request whose response carries only a header.
    fn call<B: Serialize>(&mut self, command: &str, body: Option<&B>) -> AgentResult<()> {
        let seq = self.send(command, body)?;
        self.recv_header(command, seq)
    }

    /// Request whose response carries a header followed by a body.
    fn call_with_body<B: Serialize, T: DeserializeOwned>(
        &mut self,
        command: &str,
        body: Option<&B>,
    ) -> AgentResult<T> {
        let seq = self.send(command, body)?;
        self.recv_header(command, seq)?;
        let conn = self.conn()?;
        Ok(rmp_serde::from_read(&mut conn.reader)?)
    }
}

impl AgentClient for RpcClient {
    fn members(&mut self) -> AgentResult<Vec<Member>> {
        let resp: MembersResponse = self.call_with_body(MEMBERS, None::<&()>)?;
        Ok(resp.members)
    }

    fn join(&mut self, addrs: &[String], replay: bool) -> AgentResult<usize> {
        let req = JoinRequest {
            existing: addrs.to_vec(),
            replay,
        };
        let resp: JoinResponse = self.call_with_body(JOIN, Some(&req))?;
        Ok(usize::try_from(resp.num).unwrap_or(0))
    }

    fn leave(&mut self) -> AgentResult<()> {
        self.call(LEAVE, None::<&()>)
    }

    fn force_leave(&mut self, node: &str, prune: bool) -> AgentResult<()> {
        let req = ForceLeaveRequest {
            node: node.to_string(),
            prune,
        };
        self.call(FORCE_LEAVE, Some(&req))
    }

    fn user_event(&mut self, name: &str, payload: &[u8], coalesce: bool) -> AgentResult<()> {
        let req = EventRequest {
            name: name.to_string(),
            payload: ByteBuf::from(payload.to_vec()),
            coalesce,
        };
        self.call(EVENT, Some(&req))
    }

    fn stats(&mut self) -> AgentResult<Stats> {
        self.call_with_body(STATS, None::<&()>)
    }

    fn close(&mut self) -> AgentResult<()> {
        let Some(mut conn) = self.conn.take() else {
            return Ok(());
        };
        let _ = conn.writer.flush();
        match conn.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotConnected => {}
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(address = %self.address, "agent connection closed");
        Ok(())
    }
}

impl Drop for RpcClient {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
