use crate::dashboard_api::AppState;
use crate::error::ApplicationError;
use anyhow::anyhow;
use axum::body::Bytes;
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::response::Response;
use kafka_dashboard::commands::create_topic::validate_topic_name;
use serde::Deserialize;
use std::sync::Arc;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Deserialize, Debug)]
pub struct RelayQuery {
    topic: Option<String>,
}

pub async fn relay_topic(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RelayQuery>,
) -> Result<Response, ApplicationError> {
    let topic = query.topic.filter(|topic| !topic.is_empty()).ok_or_else(|| {
        ApplicationError::InvalidArgument(anyhow!("Query parameter 'topic' is required"))
    })?;
    validate_topic_name(&topic)?;

    Ok(ws.on_upgrade(move |socket| relay_records(socket, topic, state)))
}

pub async fn stream_topic_metrics(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApplicationError> {
    validate_topic_name(&name)?;

    Ok(ws.on_upgrade(move |socket| send_topic_metrics(socket, name, state)))
}

#[tracing::instrument(skip(socket, state))]
async fn relay_records(mut socket: WebSocket, topic: String, state: Arc<AppState>) {
    let (sink, mut records) = mpsc::channel(state.viewer_buffer.max(1));
    let viewer = match state.relay.attach(&topic, sink).await {
        Ok(viewer) => viewer,
        Err(e) => {
            warn!("Couldn't attach viewer to topic {}: {}", topic, e);
            let frame = CloseFrame {
                code: close_code::ERROR,
                reason: e.to_string().into(),
            };
            let _ = socket.send(Message::Close(Some(frame))).await;
            return;
        }
    };
    info!("Viewer {} connected", viewer);

    loop {
        select! {
            payload = records.recv() => {
                let Some(payload) = payload else {
                    debug!("Relay dropped viewer {}", viewer);
                    break;
                };
                if let Err(e) = socket.send(to_message(payload)).await {
                    debug!("Failed to write to viewer {}: {}", viewer, e);
                    break;
                }
            }
            message = socket.recv() => match message {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!("Viewer {} connection failed: {}", viewer, e);
                    break;
                }
                Some(Ok(_)) => {}
            }
        }
    }

    state.relay.detach(&topic, viewer).await;
    info!("Viewer {} disconnected", viewer);
}

/// UTF-8 payloads go out as text frames.
fn to_message(payload: Bytes) -> Message {
    match std::str::from_utf8(&payload) {
        Ok(text) => Message::Text(text.into()),
        Err(_) => Message::Binary(payload),
    }
}

#[tracing::instrument(skip(socket, state))]
async fn send_topic_metrics(mut socket: WebSocket, topic: String, state: Arc<AppState>) {
    let mut interval = tokio::time::interval(state.metrics_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        select! {
            _ = interval.tick() => {
                let metrics = match state.aggregator.topic_metrics(&topic).await {
                    Ok(metrics) => metrics,
                    Err(e) => {
                        warn!("Failed to collect metrics of topic {}: {}", topic, e);
                        continue;
                    }
                };
                let text = match serde_json::to_string(&metrics) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Failed to serialize metrics of topic {}: {}", topic, e);
                        continue;
                    }
                };
                if let Err(e) = socket.send(Message::Text(text.into())).await {
                    debug!("Failed to write metrics: {}", e);
                    break;
                }
            }
            message = socket.recv() => match message {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!("Metrics connection failed: {}", e);
                    break;
                }
                Some(Ok(_)) => {}
            }
        }
    }

    debug!("Metrics stream closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_payload_is_sent_as_text() {
        let message = to_message(Bytes::from_static(b"{\"id\":1}"));

        assert!(matches!(message, Message::Text(text) if text.as_str() == "{\"id\":1}"));
    }

    #[test]
    fn binary_payload_is_sent_as_binary() {
        let message = to_message(Bytes::from_static(&[0xff, 0x00, 0x13]));

        assert!(matches!(message, Message::Binary(_)));
    }
}
