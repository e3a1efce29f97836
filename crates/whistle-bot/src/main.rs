use tracing_subscriber::EnvFilter;

use whistle_bot::config::BotConfig;
use whistle_bot::manager::RoomManager;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = BotConfig::load();
    config.validate();

    tracing::info!(rooms = config.rooms.len(), "Whistle starting");

    match RoomManager::start(&config).await {
        Ok(manager) => manager.run().await,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    }
}
