use campaign_copilot::logging;
use campaign_copilot::providers::OptionsGateway;
use campaign_copilot::server::{self, AppState};
use campaign_copilot::settings::Settings;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;

    let settings = Settings::load();
    log::info!(
        "Groq provider: {}",
        if settings.groq_api_key.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );
    log::info!(
        "OpenAI provider: {}",
        if settings.openai_api_key.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );
    if settings.groq_api_key.is_none() && settings.openai_api_key.is_none() {
        log::info!("No LLM provider configured, serving rule-based suggestions only");
    }

    let gateway = OptionsGateway::from_settings(&settings);
    let state = AppState {
        gateway: Arc::new(gateway),
    };

    server::serve(state, settings.port).await?;

    Ok(())
}
