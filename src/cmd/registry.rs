//! Sorted, read-only table of serf sub-commands.
//!
//! Two phases: collect handlers (`CommandTableBuilder::register`), then
//! freeze (`build`) which sorts by name once and rejects duplicates.
//! Lookups afterwards are binary searches.

use std::fmt;

use super::SubCommand;
use crate::error::RegistryError;

/// Collect phase.
#[derive(Default)]
pub struct CommandTableBuilder {
    commands: Vec<Box<dyn SubCommand>>,
}

impl CommandTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, command: impl SubCommand + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    pub fn register_boxed(mut self, command: Box<dyn SubCommand>) -> Self {
        self.commands.push(command);
        self
    }

    pub fn build(self) -> Result<CommandTable, RegistryError> {
        CommandTable::build(self.commands)
    }
}

/// Freeze phase: immutable, sorted ascending by `name()`.
pub struct CommandTable {
    commands: Vec<Box<dyn SubCommand>>,
}

impl CommandTable {
    /// Sort `commands` by name. Fails on the first duplicated name.
    pub fn build(mut commands: Vec<Box<dyn SubCommand>>) -> Result<Self, RegistryError> {
        commands.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        if let Some(pair) = commands.windows(2).find(|w| w[0].name() == w[1].name()) {
            return Err(RegistryError::DuplicateSubCommand {
                name: pair[0].name().to_string(),
            });
        }
        Ok(CommandTable { commands })
    }

    /// Exact, case-sensitive lookup in O(log n).
    pub fn lookup(&self, name: &str) -> Option<&dyn SubCommand> {
        let idx = self.commands.partition_point(|c| c.name() < name);
        self.commands
            .get(idx)
            .filter(|c| c.name() == name)
            .map(|c| c.as_ref() as &dyn SubCommand)
    }

    /// Names in table order.
    pub fn names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn SubCommand> {
        self.commands.iter().map(|c| c.as_ref() as &dyn SubCommand)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.iter().map(|c| c.name())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::Named;

    fn table_of(names: &[&str]) -> CommandTable {
        let commands = names
            .iter()
            .map(|n| Box::new(Named::new(n)) as Box<dyn SubCommand>)
            .collect();
        CommandTable::build(commands).unwrap()
    }

    #[test]
    fn build_sorts_by_name() {
        let table = table_of(&["leave", "members", "join"]);
        assert_eq!(table.names(), vec!["join", "leave", "members"]);
    }

    #[test]
    fn lookup_hits_and_misses() {
        let table = table_of(&["leave", "members", "join"]);
        let hit = table.lookup("members").expect("members registered");
        assert_eq!(hit.name(), "members");
        assert_eq!(hit.synopsis(), "members synopsis");
        assert!(table.lookup("evict").is_none());
        assert!(table.lookup("Members").is_none());
        assert!(table.lookup("zzz").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn empty_table_never_matches() {
        let table = table_of(&[]);
        assert!(table.is_empty());
        assert!(table.lookup("join").is_none());
        assert!(table.names().is_empty());
    }

    #[test]
    fn every_permutation_finds_every_name() {
        let all = ["event", "force-leave", "join", "leave", "members", "stats", "tags"];
        for n in 0..=all.len() {
            let names = &all[..n];
            // rotations and reversal stand in for arbitrary input order
            for shift in 0..n.max(1) {
                let mut input: Vec<&str> = names.to_vec();
                input.rotate_left(shift);
                if shift % 2 == 1 {
                    input.reverse();
                }
                let table = table_of(&input);
                assert_eq!(table.len(), n);
                for name in names {
                    let found = table.lookup(name).expect("registered name must be found");
                    assert_eq!(found.name(), *name);
                }
                for missing in ["", "a", "evict", "joins", "zzz"] {
                    assert!(table.lookup(missing).is_none(), "{missing} must not match");
                }
            }
        }
    }

    #[test]
    fn rebuilding_a_sorted_table_keeps_order() {
        let first = table_of(&["stats", "join", "event"]);
        let second = table_of(&first.names().iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(first.names(), second.names());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = CommandTableBuilder::new()
            .register(Named::new("join"))
            .register(Named::new("leave"))
            .register(Named::new("join"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateSubCommand {
                name: "join".into()
            }
        );
    }
}
