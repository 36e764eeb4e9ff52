/*!
shared.rs - helpers reused by the built-in sub-commands.

Focus:
  - parse_args: run a sub-command's clap parser over the tokens after its
    name; `--help` is written to the output handle instead of exiting
  - parse_kv: KEY=VALUE pairs (`members --tag`)
*/

use std::io::Write;

use anyhow::{Result, bail};
use clap::Parser;
use clap::error::ErrorKind;

/// Parse `args` (without the sub-command name) into `T`.
///
/// Returns `Ok(None)` when clap rendered help or version text; the caller
/// should stop without touching the agent.
pub fn parse_args<T: Parser>(args: &[String], out: &mut dyn Write) -> Result<Option<T>> {
    match T::try_parse_from(args) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(out, "{}", e.render())?;
            Ok(None)
        }
        Err(e) => bail!("{}", e.render().to_string().trim_end()),
    }
}

/// Split `KEY=VALUE`; both sides trimmed, key must be non-empty.
pub fn parse_kv(raw: &str) -> Result<(String, String)> {
    let Some((k, v)) = raw.split_once('=') else {
        bail!("invalid tag (expected KEY=VALUE): {raw}");
    };
    let key = k.trim();
    if key.is_empty() {
        bail!("invalid tag (empty key): {raw}");
    }
    Ok((key.to_string(), v.trim().to_string()))
}
