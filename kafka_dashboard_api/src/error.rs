use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use kafka_dashboard::commands::CommandError;
use kafka_dashboard::error::CollectError;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApplicationError {
    InvalidArgument(anyhow::Error),
    Collect(CollectError),
}

impl ApplicationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApplicationError::Collect(e) => match e {
                CollectError::TopicNotFound(_) | CollectError::PartitionNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                CollectError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                CollectError::Decode(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl From<CollectError> for ApplicationError {
    fn from(value: CollectError) -> Self {
        ApplicationError::Collect(value)
    }
}

impl From<CommandError> for ApplicationError {
    fn from(value: CommandError) -> Self {
        match value {
            CommandError::InvalidCommand(reason) => {
                ApplicationError::InvalidArgument(anyhow::anyhow!(reason))
            }
            CommandError::Collect(e) => ApplicationError::Collect(e),
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApplicationError::InvalidArgument(e) => format!("{e}"),
            ApplicationError::Collect(e) => format!("{e}"),
        };
        if status.is_server_error() {
            error!("{self:?}");
        } else {
            warn!("{self:?}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
