mod app_state;
mod cluster;
mod live;
mod topics;

pub use app_state::*;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(cluster::get_snapshot))
        .route("/health", get(cluster::get_health))
        .route("/kafka_metrics", get(cluster::get_kafka_metrics))
        .route("/consumer-groups", get(cluster::get_consumer_groups))
        .route("/topics", get(topics::get_topics).post(topics::create_topic))
        .route(
            "/topics/{name}",
            get(topics::get_topic).delete(topics::delete_topic),
        )
        .route("/ws", get(live::relay_topic))
        .route("/ws/topics/{name}", get(live::stream_topic_metrics))
        .with_state(state)
}
