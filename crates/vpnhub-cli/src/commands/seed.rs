//! Sample catalog seeding command.

use crate::output;
use vpnhub_auth::RbacEnforcer;
use vpnhub_core::config::AppConfig;
use vpnhub_core::error::AppError;
use vpnhub_service::ServerRegistry;

/// Insert the sample servers when the catalog is empty.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let registry = ServerRegistry::new(store.servers.clone(), RbacEnforcer::new());

    let created = registry.seed_samples().await?;
    store.close().await;

    if created == 0 {
        println!("Catalog already has servers; nothing seeded.");
    } else {
        output::print_success(&format!("Seeded {created} sample servers"));
    }
    Ok(())
}
