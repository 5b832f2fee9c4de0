use argh::FromArgs;
use infernum_gateway::RecognitionJob;
use std::path::PathBuf;

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;

#[derive(FromArgs)]
/// Client for the recognition gateway
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// command to execute: "recognize", "fetch" or "submit"
    #[argh(subcommand)]
    command: ClientCommands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum ClientCommands {
    Recognize(RecognizeCommand),
    Fetch(FetchCommand),
    Submit(SubmitCommand),
}

#[derive(FromArgs)]
/// Run recognition on a list of image URLs
#[argh(subcommand, name = "recognize")]
struct RecognizeCommand {
    /// the image URLs to process
    #[argh(positional)]
    image_urls: Vec<String>,
}

#[derive(FromArgs)]
/// Download a result file served under /output
#[argh(subcommand, name = "fetch")]
struct FetchCommand {
    /// the path returned by "recognize", e.g. /output/ab12cd34/0.jpg
    #[argh(positional)]
    path: String,

    /// where to write the file
    #[argh(option, short = 'o')]
    out: PathBuf,
}

#[derive(FromArgs)]
/// Post a job straight to a recognition service, bypassing the gateway
#[argh(subcommand, name = "submit")]
struct SubmitCommand {
    /// the recognition service URL
    #[argh(option, short = 'u')]
    url: String,

    /// the directory holding the input images
    #[argh(option, short = 'i')]
    input_dir: PathBuf,

    /// the directory the service should write into
    #[argh(option, short = 'o')]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ClientArgs = argh::from_env();

    let client = reqwest::Client::new();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    match args.command {
        ClientCommands::Recognize(recognize_command) => {
            let response = client
                .post(format!("http://{}/recognize", addr))
                .json(&serde_json::json!({ "image_urls": recognize_command.image_urls }))
                .send()
                .await?;

            println!("Status: {}", response.status());
            let result = response.json::<serde_json::Value>().await?;
            println!("Result: {}", serde_json::to_string_pretty(&result)?);
        }
        ClientCommands::Fetch(fetch_command) => {
            let path = fetch_command.path.trim_start_matches('/');
            let response = client
                .get(format!("http://{}/{}", addr, path))
                .send()
                .await?
                .error_for_status()?;

            let bytes = response.bytes().await?;
            tokio::fs::write(&fetch_command.out, &bytes).await?;
            println!(
                "Wrote {} bytes to {}",
                bytes.len(),
                fetch_command.out.display()
            );
        }
        ClientCommands::Submit(submit_command) => {
            let response = client
                .post(&submit_command.url)
                .json(&RecognitionJob::new(
                    &submit_command.input_dir,
                    &submit_command.output_dir,
                ))
                .send()
                .await?;

            println!("Status: {}", response.status());
        }
    }

    Ok(())
}
