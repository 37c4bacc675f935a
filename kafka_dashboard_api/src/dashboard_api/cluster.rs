use crate::dashboard_api::AppState;
use crate::error::ApplicationError;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use kafka_dashboard::queries::get_cluster_health::get_cluster_health;
use kafka_dashboard::queries::get_consumer_groups::get_consumer_groups as describe_consumer_groups;
use kafka_dashboard::queries::get_kafka_metrics::get_kafka_metrics as dump_kafka_metrics;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Deserialize, Debug)]
pub struct SnapshotQuery {
    #[serde(default)]
    refresh: bool,
}

pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> Result<Response, ApplicationError> {
    let snapshot = if query.refresh {
        state.aggregator.refresh().await?
    } else {
        state.aggregator.get().await?
    };

    Ok(Json(&*snapshot).into_response())
}

pub async fn get_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(get_cluster_health(&*state.broker, state.security_protocol).await)
}

pub async fn get_kafka_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApplicationError> {
    let metrics = dump_kafka_metrics(&*state.broker).await?;

    Ok(Json(metrics).into_response())
}

pub async fn get_consumer_groups(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApplicationError> {
    let groups = describe_consumer_groups(&*state.broker)
        .await?
        .into_iter()
        .map(|group| (group.name.clone(), group))
        .collect::<BTreeMap<_, _>>();

    Ok(Json(groups).into_response())
}
