pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod observability;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::application::usercases::entitlements::EntitlementUseCase;
use crate::config::config_model::{DotEnvyConfig, StorageBackend};
use crate::domain::{
    clock::SystemClock, repositories::entitlement_slots::EntitlementSlotRepository,
};
use crate::infrastructure::{
    axum_http::http_serve,
    local_storage::{file_slots::FileSlotStorage, memory_slots::MemorySlotStorage},
};

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("entitlements")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!(stage = %dotenvy_env.stage, "ENV has been loaded");

    match dotenvy_env.storage.backend {
        StorageBackend::File => {
            let storage = FileSlotStorage::new(dotenvy_env.storage.path.clone());
            info!(path = %storage.path().display(), "Using file slot storage");
            serve(dotenvy_env, storage).await
        }
        StorageBackend::Memory => {
            info!("Using in-memory slot storage; entitlements will not survive a restart");
            serve(dotenvy_env, MemorySlotStorage::new()).await
        }
    }
}

async fn serve<T>(config: Arc<DotEnvyConfig>, storage: T) -> Result<()>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
{
    // Reading features wrap this same handle in a `ReadingUseCase` with their own gateway.
    let entitlements =
        EntitlementUseCase::new(Arc::new(storage), Arc::new(SystemClock)).into_shared();

    http_serve::start(config, entitlements).await
}
