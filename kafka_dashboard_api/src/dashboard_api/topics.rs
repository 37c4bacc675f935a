use crate::dashboard_api::AppState;
use crate::error::ApplicationError;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{HeaderName, HeaderValue, StatusCode};
use kafka_dashboard::commands::create_topic::{
    create_topic as create_topic_command, validate_topic_name, CreateTopicCommandInternal,
};
use kafka_dashboard::commands::delete_topic::delete_topic as delete_topic_command;
use kafka_dashboard::models::ClusterSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Set on `/topics` responses built from a partial snapshot. Lists the failed
/// entries as `kind:name`, comma separated.
pub const PARTIAL_ERRORS_HEADER: HeaderName = HeaderName::from_static("x-partial-errors");

#[derive(Deserialize, Debug)]
pub struct CreateTopicRequest {
    pub name: String,
    pub partitions: i32,
    #[serde(default = "default_replication")]
    pub replication: i32,
}

#[derive(Serialize, Debug)]
pub struct CreateTopicResponse {
    pub name: String,
    pub created: bool,
}

fn default_replication() -> i32 {
    1
}

pub async fn get_topics(State(state): State<Arc<AppState>>) -> Result<Response, ApplicationError> {
    let snapshot = state.aggregator.get().await?;

    Ok(topics_response(&snapshot))
}

pub fn topics_response(snapshot: &ClusterSnapshot) -> Response {
    let mut response = Json(&snapshot.topics).into_response();
    if !snapshot.is_partial() {
        return response;
    }

    let failed = snapshot
        .errors
        .iter()
        .map(|e| format!("{}:{}", e.kind.as_str(), e.name))
        .collect::<Vec<_>>()
        .join(",");
    let value = HeaderValue::from_str(&failed).unwrap_or_else(|e| {
        warn!("Failed entries can't be sent as a header: {}", e);
        HeaderValue::from(snapshot.errors.len())
    });
    response.headers_mut().insert(PARTIAL_ERRORS_HEADER, value);

    response
}

pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApplicationError> {
    validate_topic_name(&name)?;
    let metrics = state.aggregator.topic_metrics(&name).await?;

    Ok(Json(metrics).into_response())
}

pub async fn create_topic(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTopicRequest>,
) -> Result<Response, ApplicationError> {
    let command = CreateTopicCommandInternal {
        name: request.name,
        partitions: request.partitions,
        replication: request.replication,
    };
    let name = command.name.clone();
    let created = create_topic_command(&state.admin, command).await?;
    if created {
        state.aggregator.invalidate();
    }

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(CreateTopicResponse { name, created })).into_response())
}

pub async fn delete_topic(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApplicationError> {
    delete_topic_command(&state.admin, &name).await?;
    state.aggregator.invalidate();

    Ok(StatusCode::NO_CONTENT)
}
