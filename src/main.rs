use std::error::Error;

use ai_llm_service::telemetry;
use api::core::config::ApiConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when present.
    // A malformed .env is fatal; a missing one is not.
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err.into());
        }
    }

    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(telemetry::layer())
        .init();

    // Refuses to start without OPENAI_API_KEY.
    let config = ApiConfig::from_env()?;

    api::start(config).await?;

    Ok(())
}
