use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

const MESSAGE_TYPES: [&str; 4] = ["info", "warning", "error", "debug"];
const SOURCES: [&str; 5] = ["sensor-1", "sensor-2", "api-gateway", "database", "cache"];

/// Reading produced to a freshly created test topic so the dashboard has
/// something to show.
#[derive(Debug, Clone, Serialize)]
pub struct SampleMessage {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub r#type: &'static str,
    pub source: &'static str,
}

impl SampleMessage {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let timestamp = Utc::now();

        Self {
            id: timestamp.timestamp_nanos_opt().unwrap_or_default(),
            timestamp,
            value: rng.gen_range(0.0..100.0),
            r#type: MESSAGE_TYPES.choose(rng).copied().unwrap_or("info"),
            source: SOURCES.choose(rng).copied().unwrap_or("sensor-1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_keys() {
        let message = SampleMessage::random(&mut rand::thread_rng());

        let json = serde_json::to_value(&message).unwrap();

        assert!(MESSAGE_TYPES.contains(&json["type"].as_str().unwrap()));
        assert!(SOURCES.contains(&json["source"].as_str().unwrap()));
        let value = json["value"].as_f64().unwrap();
        assert!((0.0..100.0).contains(&value));
        assert!(json["id"].as_i64().unwrap() > 0);
        assert!(json["timestamp"].is_string());
    }
}
