//! Usage text for `serf` without a sub-command.

use super::format::columns;
use super::registry::CommandTable;

const INDENT: &str = "    ";

/// `serf commands [a,b,c]`, names in table order.
pub fn synopsis(table: &CommandTable) -> String {
    format!("serf commands [{}]", table.names().join(","))
}

/// Fixed header naming `executable`, then one aligned `name  synopsis`
/// row per registered command, in table order.
pub fn render(executable: &str, table: &CommandTable) -> String {
    let rows: Vec<Vec<String>> = table
        .iter()
        .map(|cmd| vec![cmd.name().to_string(), cmd.synopsis().to_string()])
        .collect();
    let commands = columns(&rows)
        .into_iter()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n");

    let text = format!(
        "Usage: ./{executable} serf [command]\n\
         \n\
         {INDENT}Provides management functionality for the Serf (gossip) server.\n\
         \n\
         Commands:\n\
         \n\
         {commands}"
    );
    text.trim().to_string()
}
