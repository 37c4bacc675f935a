use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerInfo {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Hostname")]
    pub host: String,
    #[serde(rename = "Port")]
    pub port: i32,
}
