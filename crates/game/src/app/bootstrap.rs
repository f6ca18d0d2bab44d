use engine::{Cartridge, LoopConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::{ContentError, GameplayCartridge};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) cartridge: Box<dyn Cartridge>,
}

pub(crate) fn build_app() -> Result<AppWiring, ContentError> {
    info!("=== Knightfall Startup ===");

    let cartridge = GameplayCartridge::new()?;
    let config = LoopConfig::default();

    Ok(AppWiring {
        config,
        cartridge: Box::new(cartridge),
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
