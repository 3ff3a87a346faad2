//! Command domain types

/// A single validated unit of work: one external program and its arguments.
///
/// Only produced by [`crate::validation::validate_batch`], so a descriptor in hand
/// always has a non-empty program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    program: String,
    arguments: Vec<String>,
    order: i64,
}

impl CommandDescriptor {
    pub(crate) fn new(program: String, arguments: Vec<String>, order: i64) -> Self {
        Self {
            program,
            arguments,
            order,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn order(&self) -> i64 {
        self.order
    }
}

/// A non-empty set of command descriptors with pairwise-distinct `order` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    commands: Vec<CommandDescriptor>,
}

impl Batch {
    pub(crate) fn new(commands: Vec<CommandDescriptor>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn commands_mut(&mut self) -> &mut Vec<CommandDescriptor> {
        &mut self.commands
    }
}

impl IntoIterator for Batch {
    type Item = CommandDescriptor;
    type IntoIter = std::vec::IntoIter<CommandDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
