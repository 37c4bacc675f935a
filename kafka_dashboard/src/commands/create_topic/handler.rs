use crate::backend::TopicAdmin;
use crate::commands::create_topic::CreateTopicCommandInternal;
use crate::commands::CommandError;

/// Returns `false` if the topic already existed.
pub async fn create_topic<A: TopicAdmin>(
    admin: &A,
    command: CreateTopicCommandInternal,
) -> Result<bool, CommandError> {
    command.validate()?;

    let created = admin
        .create_topic(&command.name, command.partitions, command.replication)
        .await?;

    Ok(created)
}
