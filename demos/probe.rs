use argh::FromArgs;
use std::time::Duration;
use vlm_pilot::{
    ImageSample, OllamaBackend,
    config::{DEFAULT_BACKEND_URL, DEFAULT_MODEL_ID},
    probe::{self, DEFAULT_TASKS},
};

// snapshot used when no url is given
const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1465056836041-7f43ac27dcb5?q=80&w=1171&auto=format&fit=crop";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(FromArgs)]
/// Ask the calibration questions about one image and print how each answer was read.
struct ProbeArgs {
    /// the image to fetch
    #[argh(option, short = 'u', default = "DEFAULT_IMAGE_URL.to_string()")]
    image_url: String,

    /// the model to query
    #[argh(option, short = 'm', default = "DEFAULT_MODEL_ID.to_string()")]
    model: String,

    /// the inference endpoint
    #[argh(option, short = 'b', default = "DEFAULT_BACKEND_URL.to_string()")]
    backend_url: String,

    /// seconds to wait for each answer
    #[argh(option, short = 't', default = "DEFAULT_TIMEOUT_SECS")]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: ProbeArgs = argh::from_env();
    let config = probe::probe_config(
        args.model,
        args.backend_url,
        Duration::from_secs(args.timeout),
    )?;

    println!("Mission Start...\n");

    let bytes = reqwest::get(&args.image_url)
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    log::info!("Fetched {} bytes from {}", bytes.len(), args.image_url);
    let image = ImageSample::from_bytes(&bytes);

    let backend = OllamaBackend::new(&config.backend_url, config.timeout)?;
    let reports = probe::run_tasks(&backend, &config, &image, &DEFAULT_TASKS).await;

    for report in reports {
        println!("{}", report.render());
    }

    Ok(())
}
