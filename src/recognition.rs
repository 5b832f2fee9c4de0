use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use thiserror::Error;

/// Body posted to the recognition service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecognitionJob {
    pub input_dir: String,
    pub output_dir: String,
}

impl RecognitionJob {
    pub fn new(input_dir: &Path, output_dir: &Path) -> Self {
        Self {
            input_dir: input_dir.to_string_lossy().into_owned(),
            output_dir: output_dir.to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("could not call recognition service: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("recognition service returned {0}")]
    Status(StatusCode),
}

/// Client for the external recognition service.
#[derive(Clone, Debug)]
pub struct RecognitionClient {
    client: reqwest::Client,
    url: String,
}

impl RecognitionClient {
    pub fn new(
        url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submits the job and waits for the service to answer.
    ///
    /// Only `200 OK` counts as success; the service is assumed to have
    /// finished writing its output once it answers.
    pub async fn submit(&self, job: &RecognitionJob) -> Result<(), RecognitionError> {
        log::info!(
            "Submitting {} -> {} to {}",
            job.input_dir,
            job.output_dir,
            self.url
        );
        let response = self.client.post(&self.url).json(job).send().await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => {
                log::warn!("Recognition service answered {}", status);
                Err(RecognitionError::Status(status))
            }
        }
    }
}
