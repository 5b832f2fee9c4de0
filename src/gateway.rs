use serde::Deserialize;
use std::time::Instant;

use crate::{
    collect::{collect_results, wait_for_dir},
    config::GatewayConfig,
    error::GatewayError,
    fetch::Fetcher,
    job::Job,
    recognition::{RecognitionClient, RecognitionJob},
};

/// Body of `POST /recognize`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognizeRequest {
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl RecognizeRequest {
    /// Decodes and validates a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, GatewayError> {
        let request: Self = serde_json::from_slice(body)
            .map_err(|e| GatewayError::InvalidBody(e.to_string()))?;
        if request.image_urls.is_empty() {
            return Err(GatewayError::NoImages);
        }
        Ok(request)
    }
}

/// Runs the fetch, recognize, collect pipeline for one request at a time.
///
/// A `Gateway` holds no per-request state: it is shared across all request
/// tasks behind an `Arc`, and concurrent jobs are kept apart only by their
/// randomly generated directories.
#[derive(Clone, Debug)]
pub struct Gateway {
    config: GatewayConfig,
    fetcher: Fetcher,
    recognition: RecognitionClient,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let fetcher = Fetcher::new(config.insecure_fetch)?;
        let recognition =
            RecognitionClient::new(config.recognition_url.clone(), config.recognition_timeout)?;
        Ok(Self {
            config,
            fetcher,
            recognition,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Processes one request and returns the URLs of the produced files.
    ///
    /// Steps run strictly in order and the first failure ends the request.
    /// Nothing written before the failure is removed.
    pub async fn recognize(
        &self,
        request: &RecognizeRequest,
    ) -> Result<Vec<String>, GatewayError> {
        let start_time = Instant::now();

        let job = Job::allocate(&self.config.input_root, &self.config.output_root)
            .await
            .map_err(GatewayError::JobDir)?;
        log::info!(
            "Job {} started with {} image(s)",
            job.id,
            request.image_urls.len()
        );

        for (index, url) in request.image_urls.iter().enumerate() {
            self.fetcher
                .fetch(url, &job.input_file(index))
                .await
                .map_err(|source| GatewayError::Fetch {
                    url: url.clone(),
                    source,
                })?;
        }

        self.recognition
            .submit(&RecognitionJob::new(&job.input_dir, &job.output_dir))
            .await?;

        if !self.config.output_wait.is_zero()
            && !wait_for_dir(&job.output_dir, self.config.output_wait).await
        {
            log::warn!(
                "Job {}: output dir did not appear within {:?}",
                job.id,
                self.config.output_wait
            );
        }

        let urls = collect_results(&job.output_dir, &job.id)
            .await
            .map_err(GatewayError::OutputDir)?;

        log::info!(
            "Job {} finished with {} result(s) in {:?}",
            job.id,
            urls.len(),
            start_time.elapsed()
        );
        Ok(urls)
    }
}
