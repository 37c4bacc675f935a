use serde::Serialize;
use std::collections::BTreeMap;

/// Serialized under its group name, so the name itself is not part of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumerGroupView {
    #[serde(skip)]
    pub name: String,
    pub state: String,
    /// Keyed by client id.
    pub members: BTreeMap<String, GroupMemberView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberView {
    pub member_id: String,
    pub client_host: String,
    pub topics: Vec<String>,
}
