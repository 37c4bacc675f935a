use crate::backend::CoordinationClient;
use crate::collectors::{broker_path, BROKER_IDS_PATH};
use crate::error::CollectError;
use crate::models::BrokerInfo;
use anyhow::{anyhow, Context};
use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
struct BrokerRegistration {
    host: Option<String>,
    #[serde(default)]
    port: i32,
    #[serde(default)]
    endpoints: Vec<String>,
}

pub async fn get_broker_ids<C: CoordinationClient>(
    coordination: &C,
) -> Result<Vec<String>, CollectError> {
    Ok(coordination.children(BROKER_IDS_PATH).await?)
}

pub async fn get_broker_info<C: CoordinationClient>(
    coordination: &C,
    broker_id: &str,
) -> Result<BrokerInfo, CollectError> {
    let id = broker_id
        .parse::<i32>()
        .with_context(|| format!("Broker id '{}' is not a number", broker_id))
        .map_err(decode_error)?;

    let data = coordination.data(&broker_path(broker_id)).await?;

    parse_broker_registration(id, &data)
        .with_context(|| format!("While decoding registration of broker {}", id))
        .map_err(decode_error)
}

fn decode_error(error: anyhow::Error) -> CollectError {
    warn!("{:#}", error);
    CollectError::Decode(error)
}

fn parse_broker_registration(id: i32, data: &[u8]) -> Result<BrokerInfo, anyhow::Error> {
    let registration: BrokerRegistration =
        serde_json::from_slice(data).context("While parsing broker registration json")?;

    if let Some(host) = registration.host.filter(|h| !h.is_empty()) {
        return Ok(BrokerInfo {
            id,
            host,
            port: registration.port,
        });
    }

    let endpoint = registration
        .endpoints
        .first()
        .ok_or_else(|| anyhow!("Registration has neither host nor endpoints"))?;
    let (host, port) = parse_endpoint(endpoint)?;

    Ok(BrokerInfo { id, host, port })
}

/// Parses `PROTOCOL://host:port`.
fn parse_endpoint(endpoint: &str) -> Result<(String, i32), anyhow::Error> {
    let address = endpoint
        .split_once("://")
        .map(|(_, address)| address)
        .unwrap_or(endpoint);
    let (host, port) = address
        .rsplit_once(':')
        .with_context(|| format!("Endpoint '{}' has no port", endpoint))?;
    let port = port
        .parse()
        .with_context(|| format!("Endpoint '{}' has an invalid port", endpoint))?;

    Ok((host.trim_matches(&['[', ']'][..]).to_owned(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_port_are_taken_from_registration() {
        let data = br#"{"host":"kafka-1","port":9092,"endpoints":["PLAINTEXT://kafka-1:9092"],"version":4}"#;

        assert_eq!(
            parse_broker_registration(1, data).unwrap(),
            BrokerInfo {
                id: 1,
                host: "kafka-1".to_owned(),
                port: 9092
            }
        );
    }

    #[test]
    fn listener_registration_falls_back_to_endpoints() {
        let data = br#"{"host":null,"port":-1,"endpoints":["SASL_SSL://[::1]:9094"],"version":5}"#;

        assert_eq!(
            parse_broker_registration(3, data).unwrap(),
            BrokerInfo {
                id: 3,
                host: "::1".to_owned(),
                port: 9094
            }
        );
    }

    #[test]
    fn registration_without_address_is_an_error() {
        assert!(parse_broker_registration(1, br#"{"version":5}"#).is_err());
        assert!(parse_endpoint("PLAINTEXT://kafka-1").is_err());
    }
}
