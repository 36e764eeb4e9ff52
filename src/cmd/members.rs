/*!
`members.rs`

`serf members` - list known cluster members.

Filters (all optional, combined with AND):
  --status S        exact status match (alive, leaving, left, failed)
  --name SUBSTR     substring of the member name
  --tag K=V         exact tag match, repeatable

Output:
  human: NAME  ADDR  STATUS  TAGS   (+ PROTOCOL / DELEGATE with --detailed)
  --json:
    { "members": [ { "name", "addr", "port", "status", "tags", ... } ] }
*/

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use clap::Parser;

use super::SubCommand;
use super::format::{StyleOptions, status, table};
use super::shared::{parse_args, parse_kv};
use crate::agent::AgentClient;
use crate::agent::protocol::Member;

#[derive(Parser, Debug)]
#[command(name = "members", no_binary_name = true, about = "Lists the members of a Serf cluster")]
struct MembersArgs {
    /// Only show members with this status
    #[arg(long, value_name = "STATUS")]
    status: Option<String>,

    /// Only show members whose name contains this text
    #[arg(long, value_name = "SUBSTR")]
    name: Option<String>,

    /// Only show members carrying this tag (repeatable KEY=VALUE)
    #[arg(long = "tag", value_name = "KEY=VALUE")]
    tags: Vec<String>,

    /// Include protocol and delegate versions
    #[arg(long)]
    detailed: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub struct Members {
    style: StyleOptions,
}

impl Members {
    pub fn new(style: StyleOptions) -> Self {
        Members { style }
    }
}

impl SubCommand for Members {
    fn name(&self) -> &str {
        "members"
    }

    fn synopsis(&self) -> &str {
        "Lists the members of a Serf cluster"
    }

    fn invoke(
        &self,
        client: &mut dyn AgentClient,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<()> {
        let Some(args) = parse_args::<MembersArgs>(args, out)? else {
            return Ok(());
        };
        let wanted_tags = args
            .tags
            .iter()
            .map(|t| parse_kv(t))
            .collect::<Result<BTreeMap<_, _>>>()?;

        let members: Vec<Member> = client
            .members()?
            .into_iter()
            .filter(|m| matches_filters(m, &args, &wanted_tags))
            .collect();

        if args.json {
            let items: Vec<serde_json::Value> = members.iter().map(member_json).collect();
            writeln!(out, "{}", serde_json::json!({ "members": items }))?;
            return Ok(());
        }

        if members.is_empty() {
            return Ok(());
        }
        let mut headers = vec!["NAME", "ADDR", "STATUS", "TAGS"];
        if args.detailed {
            headers.extend(["PROTOCOL", "DELEGATE"]);
        }
        let rows: Vec<Vec<String>> = members
            .iter()
            .map(|m| {
                let mut row = vec![
                    m.name.clone(),
                    m.address(),
                    status(&m.status, &self.style),
                    format_tags(&m.tags),
                ];
                if args.detailed {
                    row.push(format!("{} [{}, {}]", m.protocol_cur, m.protocol_min, m.protocol_max));
                    row.push(format!("{} [{}, {}]", m.delegate_cur, m.delegate_min, m.delegate_max));
                }
                row
            })
            .collect();
        writeln!(out, "{}", table(&headers, &rows, &self.style))?;
        Ok(())
    }
}

fn matches_filters(m: &Member, args: &MembersArgs, tags: &BTreeMap<String, String>) -> bool {
    if let Some(s) = &args.status {
        if &m.status != s {
            return false;
        }
    }
    if let Some(n) = &args.name {
        if !m.name.contains(n.as_str()) {
            return false;
        }
    }
    tags.iter().all(|(k, v)| m.tags.get(k) == Some(v))
}

fn format_tags(tags: &BTreeMap<String, String>) -> String {
    tags.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn member_json(m: &Member) -> serde_json::Value {
    serde_json::json!({
        "name": m.name,
        "addr": m.ip().map(|ip| ip.to_string()),
        "port": m.port,
        "status": m.status,
        "tags": m.tags,
        "protocol": { "min": m.protocol_min, "max": m.protocol_max, "cur": m.protocol_cur },
        "delegate": { "min": m.delegate_min, "max": m.delegate_max, "cur": m.delegate_cur },
    })
}
