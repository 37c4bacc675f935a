use crate::backend::TopicAdmin;
use crate::commands::create_topic::validate_topic_name;
use crate::commands::CommandError;

pub async fn delete_topic<A: TopicAdmin>(admin: &A, name: &str) -> Result<(), CommandError> {
    validate_topic_name(name)?;
    admin.delete_topic(name).await?;

    Ok(())
}
