use argh::FromArgs;
use infernum_gateway::{Gateway, GatewayConfig, config, router};
use std::{path::PathBuf, sync::Arc, time::Duration};

// defaults for the server
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(FromArgs)]
/// Gateway that downloads images and hands them to a recognition service.
struct GatewayArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to run the server on
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// directory to store downloaded input images
    #[argh(
        option,
        default = "PathBuf::from(env_or(\"GATEWAY_INPUT_DIR\", config::DEFAULT_INPUT_ROOT))"
    )]
    input: PathBuf,

    /// directory where the recognition service writes processed images
    #[argh(
        option,
        default = "PathBuf::from(env_or(\"GATEWAY_OUTPUT_DIR\", config::DEFAULT_OUTPUT_ROOT))"
    )]
    output: PathBuf,

    /// URL where the recognition service is waiting
    #[argh(
        option,
        default = "env_or(\"GATEWAY_DARKFLOW_URL\", config::DEFAULT_RECOGNITION_URL)"
    )]
    darkflow_url: String,

    /// skip TLS certificate verification when downloading images
    #[argh(switch)]
    insecure: bool,

    /// timeout in seconds for the recognition call (none by default)
    #[argh(option)]
    recognition_timeout: Option<u64>,

    /// seconds to wait for the output directory to appear (0 by default)
    #[argh(option, default = "0")]
    output_wait: u64,
}

impl GatewayArgs {
    fn config(&self) -> GatewayConfig {
        GatewayConfig {
            input_root: self.input.clone(),
            output_root: self.output.clone(),
            recognition_url: self.darkflow_url.clone(),
            insecure_fetch: self.insecure,
            recognition_timeout: self.recognition_timeout.map(Duration::from_secs),
            output_wait: Duration::from_secs(self.output_wait),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: GatewayArgs = argh::from_env();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let config = args.config().prepare_roots().await?;

    log::info!("Staging input images in {}", config.input_root.display());
    log::info!("Starting file server at {}", config.output_root.display());
    log::info!("Recognition service at {}", config.recognition_url);

    let gateway = Arc::new(Gateway::new(config)?);
    let app = router(gateway);

    log::info!("Listening on: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
