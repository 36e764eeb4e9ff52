/*!
Serf sub-command plumbing.

Layout:
  src/cmd/
    mod.rs          (this file: SubCommand contract + re-exports)
    registry.rs     (CommandTableBuilder / CommandTable: sort once, binary search)
    dispatch.rs     (Dispatcher: lookup -> connect -> invoke -> close)
    help.rs         (usage text for `serf` with no arguments)
    format.rs       (column alignment + optional ANSI color)
    shared.rs       (argument parsing helpers shared by sub-commands)
    members.rs, join.rs, leave.rs, force_leave.rs, event.rs, stats.rs
                    (built-in sub-commands)

Conventions:
  - Each sub-command is a plain struct implementing `SubCommand`.
  - Arguments are parsed inside `invoke` with a `clap::Parser` struct so
    `serf <name> --help` works per sub-command.
  - Sub-commands write to the `out` handle they are given, never to stdout
    directly.
*/

use std::io::Write;

use crate::agent::AgentClient;

pub mod dispatch;
pub mod event;
pub mod force_leave;
pub mod format;
pub mod help;
pub mod join;
pub mod leave;
pub mod members;
pub mod registry;
pub mod shared;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::Dispatcher;
pub use event::Event;
pub use force_leave::ForceLeave;
pub use join::Join;
pub use leave::Leave;
pub use members::Members;
pub use registry::{CommandTable, CommandTableBuilder};
pub use stats::Stats;

/// A named management action run against a connected agent.
pub trait SubCommand {
    /// Name used on the command line; unique within a table.
    fn name(&self) -> &str;

    /// One-line description for help output.
    fn synopsis(&self) -> &str;

    fn invoke(
        &self,
        client: &mut dyn AgentClient,
        args: &[String],
        out: &mut dyn Write,
    ) -> anyhow::Result<()>;
}

/// The built-in sub-commands, unsorted.
pub fn builtin(style: format::StyleOptions) -> CommandTableBuilder {
    CommandTableBuilder::new()
        .register(Members::new(style.clone()))
        .register(Join)
        .register(Leave)
        .register(ForceLeave)
        .register(Event)
        .register(Stats::new(style))
}
