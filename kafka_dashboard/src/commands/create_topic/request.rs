use crate::commands::CommandError;

const MAX_TOPIC_NAME_LENGTH: usize = 249;

#[derive(Debug, Clone)]
pub struct CreateTopicCommandInternal {
    pub name: String,
    pub partitions: i32,
    pub replication: i32,
}

impl CreateTopicCommandInternal {
    pub fn validate(&self) -> Result<(), CommandError> {
        validate_topic_name(&self.name)?;

        if self.partitions < 1 {
            return Err(CommandError::InvalidCommand(format!(
                "Partitions count must be positive, got {}",
                self.partitions
            )));
        }
        if self.replication < 1 {
            return Err(CommandError::InvalidCommand(format!(
                "Replication factor must be positive, got {}",
                self.replication
            )));
        }

        Ok(())
    }
}

/// Names are limited to ASCII alphanumerics, `.`, `_` and `-`.
pub fn validate_topic_name(name: &str) -> Result<(), CommandError> {
    if name.is_empty() {
        return Err(CommandError::InvalidCommand(
            "Topic name is empty".to_owned(),
        ));
    }
    if name.len() > MAX_TOPIC_NAME_LENGTH {
        return Err(CommandError::InvalidCommand(format!(
            "Topic name is longer than {MAX_TOPIC_NAME_LENGTH} characters"
        )));
    }
    if name == "." || name == ".." {
        return Err(CommandError::InvalidCommand(format!(
            "Topic name can't be {name}"
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(CommandError::InvalidCommand(format!(
            "Topic name contains illegal character '{c}'"
        )));
    }

    Ok(())
}
