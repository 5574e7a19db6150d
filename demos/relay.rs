use argh::FromArgs;
use std::{path::PathBuf, sync::Arc, time::Duration};
use vlm_pilot::{
    FileSink, GenerationOptions, Relay, RelayConfig,
    config::{DEFAULT_BACKEND_URL, DEFAULT_MODEL_ID},
    service,
};

// defaults for the server
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(FromArgs)]
/// Relay snapshots from a drone to a vision-language model and answer with a flight command.
struct RelayArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to run the server on
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// the model to query
    #[argh(option, short = 'm', default = "DEFAULT_MODEL_ID.to_string()")]
    model: String,

    /// the inference endpoint
    #[argh(option, short = 'b', default = "DEFAULT_BACKEND_URL.to_string()")]
    backend_url: String,

    /// seconds to wait for the model before hovering
    #[argh(option, short = 't', default = "DEFAULT_TIMEOUT_SECS")]
    timeout: u64,

    /// cap on generated tokens
    #[argh(option, default = "GenerationOptions::MAX_TOKENS")]
    max_tokens: u32,

    /// where to save the latest snapshot, e.g. debug_unity_image.jpg
    #[argh(option, short = 'd')]
    debug_image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: RelayArgs = argh::from_env();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let config = RelayConfig {
        model_id: args.model,
        backend_url: args.backend_url,
        timeout: Duration::from_secs(args.timeout),
        options: GenerationOptions::greedy(args.max_tokens),
    };

    let mut relay = Relay::from_config(config)?;
    if let Some(path) = args.debug_image {
        log::info!("Saving snapshots to {}", path.display());
        relay = relay.with_sink(Arc::new(FileSink::new(path)));
    }

    log::info!(
        "Asking {} at {}",
        relay.config().model_id,
        relay.config().backend_url
    );

    let app = service::router(Arc::new(relay));

    log::info!("🚀 Starting the relay");
    log::info!("🔥 Listening on: {}", addr);
    log::info!("🔧 Press Ctrl+C to stop the server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
