use crate::error::CollectError;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CommandError {
    /// The command was rejected before reaching the cluster.
    InvalidCommand(String),
    Collect(CollectError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidCommand(reason) => write!(f, "Invalid command: {reason}"),
            CommandError::Collect(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::InvalidCommand(_) => None,
            CommandError::Collect(e) => Some(e),
        }
    }
}

impl From<CollectError> for CommandError {
    fn from(value: CollectError) -> Self {
        CommandError::Collect(value)
    }
}
