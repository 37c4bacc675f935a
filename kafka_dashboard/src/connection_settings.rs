use crate::consumer::{SaslMechanism, SecurityProtocol};
use anyhow::bail;
use rdkafka::ClientConfig;
use std::fmt::{Debug, Formatter};

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub brokers: Vec<String>,
    pub security_protocol: SecurityProtocol,
    pub sasl: Option<SaslCredentials>,
    pub ssl: SslSettings,
}

#[derive(Clone)]
pub struct SaslCredentials {
    pub mechanism: SaslMechanism,
    pub username: String,
    pub password: String,
}

impl Debug for SaslCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaslCredentials")
            .field("mechanism", &self.mechanism)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SslSettings {
    pub ca_location: Option<String>,
    pub certificate_location: Option<String>,
    pub key_location: Option<String>,
    pub verify_certificates: bool,
}

impl ConnectionSettings {
    pub fn plaintext(brokers: Vec<String>) -> Self {
        Self {
            brokers,
            security_protocol: SecurityProtocol::Plaintext,
            sasl: None,
            ssl: SslSettings::default(),
        }
    }
}

impl TryFrom<&ConnectionSettings> for ClientConfig {
    type Error = anyhow::Error;

    fn try_from(value: &ConnectionSettings) -> Result<Self, Self::Error> {
        if value.brokers.is_empty() {
            bail!("No brokers specified")
        }

        let mut config = ClientConfig::new();

        let brokers_string = value.brokers.join(",");
        config
            .set("bootstrap.servers", brokers_string)
            .set("security.protocol", value.security_protocol.to_string());

        if value.security_protocol.uses_sasl() {
            let Some(sasl) = &value.sasl else {
                bail!(
                    "Security protocol {} requires SASL credentials",
                    value.security_protocol
                )
            };
            config
                .set("sasl.mechanisms", sasl.mechanism.to_string())
                .set("sasl.username", &sasl.username)
                .set("sasl.password", &sasl.password);
        }

        // https://raw.githubusercontent.com/confluentinc/librdkafka/master/CONFIGURATION.md
        if value.security_protocol.uses_ssl() {
            let ssl = &value.ssl;
            config.set(
                "enable.ssl.certificate.verification",
                ssl.verify_certificates.to_string(),
            );
            if let Some(ca) = &ssl.ca_location {
                config.set("ssl.ca.location", ca);
            }
            match (&ssl.certificate_location, &ssl.key_location) {
                (Some(certificate), Some(key)) => {
                    config
                        .set("ssl.certificate.location", certificate)
                        .set("ssl.key.location", key);
                }
                (None, None) => {}
                _ => bail!("Client certificate and key must be specified together"),
            }
        }

        if let Ok(value) = std::env::var("RD_KAFKA_DEBUG") {
            config.set("debug", value);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_config_sets_brokers_and_protocol() {
        let settings = ConnectionSettings::plaintext(vec![
            "kafka-1:9092".to_owned(),
            "kafka-2:9092".to_owned(),
        ]);

        let config = ClientConfig::try_from(&settings).unwrap();

        assert_eq!(
            config.get("bootstrap.servers"),
            Some("kafka-1:9092,kafka-2:9092")
        );
        assert_eq!(config.get("security.protocol"), Some("plaintext"));
        assert_eq!(config.get("sasl.mechanisms"), None);
    }

    #[test]
    fn empty_brokers_are_rejected() {
        let settings = ConnectionSettings::plaintext(vec![]);

        assert!(ClientConfig::try_from(&settings).is_err());
    }

    #[test]
    fn sasl_without_credentials_is_rejected() {
        let mut settings = ConnectionSettings::plaintext(vec!["kafka:9092".to_owned()]);
        settings.security_protocol = SecurityProtocol::SaslPlaintext;

        assert!(ClientConfig::try_from(&settings).is_err());
    }

    #[test]
    fn sasl_ssl_sets_mechanism_and_certificates() {
        let settings = ConnectionSettings {
            brokers: vec!["kafka:9093".to_owned()],
            security_protocol: SecurityProtocol::SaslSsl,
            sasl: Some(SaslCredentials {
                mechanism: SaslMechanism::ScramSha512,
                username: "dashboard".to_owned(),
                password: "secret".to_owned(),
            }),
            ssl: SslSettings {
                ca_location: Some("/certs/ca.pem".to_owned()),
                certificate_location: None,
                key_location: None,
                verify_certificates: true,
            },
        };

        let config = ClientConfig::try_from(&settings).unwrap();

        assert_eq!(config.get("security.protocol"), Some("sasl_ssl"));
        assert_eq!(config.get("sasl.mechanisms"), Some("SCRAM-SHA-512"));
        assert_eq!(config.get("sasl.username"), Some("dashboard"));
        assert_eq!(config.get("ssl.ca.location"), Some("/certs/ca.pem"));
        assert_eq!(
            config.get("enable.ssl.certificate.verification"),
            Some("true")
        );
    }

    #[test]
    fn certificate_without_key_is_rejected() {
        let mut settings = ConnectionSettings::plaintext(vec!["kafka:9093".to_owned()]);
        settings.security_protocol = SecurityProtocol::Ssl;
        settings.ssl.certificate_location = Some("/certs/client.pem".to_owned());

        assert!(ClientConfig::try_from(&settings).is_err());
    }
}
