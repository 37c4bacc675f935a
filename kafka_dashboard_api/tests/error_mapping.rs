use anyhow::anyhow;
use axum::response::IntoResponse;
use http::StatusCode;
use kafka_dashboard::commands::CommandError;
use kafka_dashboard::error::CollectError;
use kafka_dashboard_api::error::ApplicationError;

fn status(error: impl Into<ApplicationError>) -> StatusCode {
    let error: ApplicationError = error.into();
    error.into_response().status()
}

#[test]
fn collect_errors_map_to_http_statuses() {
    assert_eq!(
        status(CollectError::TopicNotFound("orders".to_owned())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status(CollectError::PartitionNotFound {
            topic: "orders".to_owned(),
            partition: 7,
        }),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status(CollectError::BackendUnavailable(anyhow!("connection refused"))),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        status(CollectError::Decode(anyhow!("bad json"))),
        StatusCode::BAD_GATEWAY
    );
}

#[test]
fn invalid_commands_are_bad_requests() {
    assert_eq!(
        status(CommandError::InvalidCommand("Topic name is empty".to_owned())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status(CommandError::Collect(CollectError::TopicNotFound(
            "orders".to_owned()
        ))),
        StatusCode::NOT_FOUND
    );
}
