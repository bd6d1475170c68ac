use chanmon::dialplan::APPLICATIONS;
use chanmon::{AdminBridgeServer, Channel, ChannelList, MonitorConfig, MonitorManager};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Init Logging first so config loading is visible
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Starting channel monitor server...");

    let config = MonitorConfig::from_env();
    let manager = Arc::new(MonitorManager::new(&config));

    // Channels to expose for local testing, comma separated
    let registry = Arc::new(ChannelList::default());
    let seeded = std::env::var("CHANMON_CHANNELS").unwrap_or_default();
    for name in seeded.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        info!("  Channel: {}", name);
        registry.add(Arc::new(Channel::new(name)));
    }

    for app in APPLICATIONS {
        info!("Dial-plan application {}: {}", app.name, app.synopsis);
    }

    let server = AdminBridgeServer::new(config.bind_addr.clone(), manager, registry);
    server.run().await
}
