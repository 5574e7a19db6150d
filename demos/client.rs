use argh::FromArgs;
use std::path::PathBuf;
use vlm_pilot::{ImageSample, service::PilotRequest, service::PilotResponse};

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5000;

#[derive(FromArgs)]
/// Send one snapshot to the relay and print the command it decides.
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// the path to the JPEG snapshot
    #[argh(option, short = 'i')]
    image_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: ClientArgs = argh::from_env();

    let bytes = tokio::fs::read(&args.image_path).await?;
    let image = ImageSample::from_bytes(&bytes);

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let response = reqwest::Client::new()
        .post(format!("http://{}/pilot", addr))
        .json(&PilotRequest {
            image: Some(image.encoded().to_string()),
        })
        .send()
        .await?;

    let status = response.status();
    let body = response.json::<PilotResponse>().await?;
    log::debug!("Relay answered with status {}", status);
    println!("{}", body.command);

    Ok(())
}
