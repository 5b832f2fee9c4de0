use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{fetch::FetchError, recognition::RecognitionError};

/// Everything that can end a recognize request early.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid json body: {0}")]
    InvalidBody(String),

    #[error("invalid json body: no image urls given")]
    NoImages,

    #[error("could not create input dir: {0}")]
    JobDir(#[source] std::io::Error),

    #[error("{url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error("could not read output dir: {0}")]
    OutputDir(#[source] std::io::Error),

    #[error("could not build http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl GatewayError {
    /// HTTP status reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidBody(_) | GatewayError::NoImages => StatusCode::BAD_REQUEST,
            GatewayError::Recognition(RecognitionError::Status(status)) => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::warn!("Sending {} error response: {}", status, self);
        (status, Json(json!({ "reason": self.to_string() }))).into_response()
    }
}
