use anyhow::Result;
use clap::Parser;
use tracing::info;

use hrms_core::config::AppConfig;
use hrms_core::infrastructure::{logger, web};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cfg = AppConfig::parse();
    logger::init(&cfg.log_config());

    info!(
        "Starting HRMS core v{} (store: {}, latency: {}ms)",
        hrms_core::VERSION,
        cfg.store_type,
        cfg.latency_ms
    );
    if cfg.strict_role_refs {
        info!("Strict role references enabled");
    }
    if cfg.strict_status_transitions {
        info!("Strict status transitions enabled");
    }

    let services = cfg.build_services()?;
    web::start_web_server(&cfg.bind, services).await
}
