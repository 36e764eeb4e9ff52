//! Serf agent RPC message shapes.
//!
//! Field names follow the agent's msgpack encoding (PascalCase keys).

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

/// Highest IPC version this client speaks.
pub const IPC_VERSION: i32 = 1;

pub const HANDSHAKE: &str = "handshake";
pub const AUTH: &str = "auth";
pub const MEMBERS: &str = "members";
pub const JOIN: &str = "join";
pub const LEAVE: &str = "leave";
pub const FORCE_LEAVE: &str = "force-leave";
pub const EVENT: &str = "event";
pub const STATS: &str = "stats";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestHeader {
    pub command: String,
    pub seq: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResponseHeader {
    pub seq: u64,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HandshakeRequest {
    pub version: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthRequest {
    pub auth_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JoinRequest {
    pub existing: Vec<String>,
    pub replay: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct JoinResponse {
    pub num: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForceLeaveRequest {
    pub node: String,
    pub prune: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRequest {
    pub name: String,
    pub payload: ByteBuf,
    pub coalesce: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MembersResponse {
    pub members: Vec<Member>,
}

/// Section name -> key -> value, as reported by the agent.
pub type Stats = BTreeMap<String, BTreeMap<String, String>>;

/// One cluster member as reported by the agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Member {
    pub name: String,
    /// Raw 4 or 16 byte address.
    pub addr: ByteBuf,
    pub port: u16,
    pub tags: BTreeMap<String, String>,
    pub status: String,
    pub protocol_min: u8,
    pub protocol_max: u8,
    pub protocol_cur: u8,
    pub delegate_min: u8,
    pub delegate_max: u8,
    pub delegate_cur: u8,
}

impl Member {
    /// Decode the raw address bytes; `None` for malformed lengths.
    pub fn ip(&self) -> Option<IpAddr> {
        let raw: &[u8] = self.addr.as_ref();
        match raw.len() {
            4 => {
                let b: [u8; 4] = raw.try_into().ok()?;
                Some(IpAddr::V4(Ipv4Addr::from(b)))
            }
            16 => {
                let b: [u8; 16] = raw.try_into().ok()?;
                let v6 = Ipv6Addr::from(b);
                Some(match v6.to_ipv4_mapped() {
                    Some(v4) => IpAddr::V4(v4),
                    None => IpAddr::V6(v6),
                })
            }
            _ => None,
        }
    }

    /// `ip:port`, with IPv6 hosts bracketed.
    pub fn address(&self) -> String {
        match self.ip() {
            Some(IpAddr::V4(v4)) => format!("{v4}:{}", self.port),
            Some(IpAddr::V6(v6)) => format!("[{v6}]:{}", self.port),
            None => format!("?:{}", self.port),
        }
    }
}
