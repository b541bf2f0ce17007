use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use analytics::AnalyticsError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Dataset error: {0}")]
    Load(#[from] dataset::LoadError),
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Analytics(AnalyticsError::InvalidParameter(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Analytics(err @ AnalyticsError::Parse { .. }) => {
                tracing::warn!(error = %err, "Dataset has rows that cannot be bucketed by time.");
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            AppError::Load(load_err) => {
                tracing::error!(error = ?load_err, "Dataset load error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while loading the dataset".to_string(),
                )
            }
            AppError::Config(config_err) => {
                tracing::error!(error = ?config_err, "Configuration error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A server configuration error occurred".to_string(),
                )
            }
            AppError::Task(join_err) => {
                tracing::error!(error = ?join_err, "Analytics task failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during analysis".to_string(),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;

    #[test]
    fn maps_errors_to_status_codes() {
        let bad = AppError::from(AnalyticsError::InvalidParameter("window".to_string()));
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);

        let parse = AppError::from(AnalyticsError::Parse {
            row: 3,
            source: CoreError::TimestampOutOfRange(i64::MAX),
        });
        assert_eq!(parse.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing = AppError::from(dataset::LoadError::ColumnCount {
            line: 1,
            expected: 12,
            found: 2,
        });
        assert_eq!(missing.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
