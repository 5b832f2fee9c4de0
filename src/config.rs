use std::{path::PathBuf, time::Duration};

/// Default directory where downloaded input images are staged.
pub const DEFAULT_INPUT_ROOT: &str = "/input";
/// Default directory where the recognition service writes its results.
pub const DEFAULT_OUTPUT_ROOT: &str = "/output";
/// Default address of the recognition service.
pub const DEFAULT_RECOGNITION_URL: &str = "http://darkflow:8000";

/// Runtime configuration of a [`crate::Gateway`].
///
/// Built once at startup and handed to [`crate::Gateway::new`]; nothing in the
/// crate reads configuration from ambient state.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Root under which one input directory per job is created.
    pub input_root: PathBuf,
    /// Root under which the recognition service writes one directory per job.
    pub output_root: PathBuf,
    /// Endpoint that receives `{input_dir, output_dir}` job descriptions.
    pub recognition_url: String,
    /// Skip TLS certificate verification when downloading images.
    pub insecure_fetch: bool,
    /// Upper bound for the recognition call. `None` waits indefinitely.
    pub recognition_timeout: Option<Duration>,
    /// How long to poll for the job's output directory to appear before
    /// listing it. Zero lists immediately.
    pub output_wait: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from(DEFAULT_INPUT_ROOT),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            recognition_url: DEFAULT_RECOGNITION_URL.to_string(),
            insecure_fetch: false,
            recognition_timeout: None,
            output_wait: Duration::ZERO,
        }
    }
}

impl GatewayConfig {
    /// Creates both directory roots if they are missing and resolves them to
    /// absolute paths, which is what the recognition service is handed.
    pub async fn prepare_roots(mut self) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&self.input_root).await?;
        tokio::fs::create_dir_all(&self.output_root).await?;
        self.input_root = tokio::fs::canonicalize(&self.input_root).await?;
        self.output_root = tokio::fs::canonicalize(&self.output_root).await?;
        Ok(self)
    }
}
