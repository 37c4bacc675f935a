use crate::backend::{BrokerClient, GroupDescription};
use crate::error::CollectError;
use crate::models::{ConsumerGroupView, GroupMemberView};
use crate::queries::get_consumer_groups::decode_assigned_topics;
use std::collections::BTreeMap;
use tracing::warn;

const CONSUMER_PROTOCOL_TYPE: &str = "consumer";

pub async fn get_consumer_groups<B: BrokerClient>(
    broker: &B,
) -> Result<Vec<ConsumerGroupView>, CollectError> {
    let mut groups = broker
        .consumer_groups()
        .await?
        .into_iter()
        .map(to_view)
        .collect::<Vec<_>>();
    groups.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(groups)
}

fn to_view(group: GroupDescription) -> ConsumerGroupView {
    let mut members = BTreeMap::<String, GroupMemberView>::new();

    for member in group.members {
        let topics = match (&member.assignment, group.protocol_type.as_str()) {
            (Some(assignment), CONSUMER_PROTOCOL_TYPE) => decode_assigned_topics(assignment)
                .unwrap_or_else(|e| {
                    warn!(
                        "Assignment of member {} in group {} is malformed: {:#}",
                        member.id, group.name, e
                    );
                    Vec::new()
                }),
            _ => Vec::new(),
        };

        let view = members
            .entry(member.client_id)
            .or_insert_with(|| GroupMemberView {
                member_id: member.id,
                client_host: member.client_host,
                topics: Vec::new(),
            });
        view.topics.extend(topics);
        view.topics.sort();
        view.topics.dedup();
    }

    ConsumerGroupView {
        name: group.name,
        state: group.state,
        members,
    }
}
