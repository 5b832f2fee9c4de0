use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not fetch image: {0}")]
    Request(#[from] reqwest::Error),

    #[error("could not write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads remote images into local files.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Builds a fetcher. With `insecure` set, TLS certificates of image hosts
    /// are not verified; only use it against trusted networks.
    pub fn new(insecure: bool) -> Result<Self, reqwest::Error> {
        if insecure {
            log::warn!("TLS certificate verification is disabled for image downloads");
        }
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url` and streams the whole body into a new file at `dest`.
    ///
    /// A partially written file is left in place if the transfer fails.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        log::debug!("Fetched {} ({} bytes) into {}", url, written, dest.display());
        Ok(written)
    }
}
