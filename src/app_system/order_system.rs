use tracing::{error, info, instrument};

use super::SystemError;
use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::ledger::LedgerClient;
use crate::orders::OrderClient;
use crate::pricing::PricingEngine;

/// The storefront back end: the catalog and ledger actors plus the order
/// client wired on top of them.
///
/// Responsible for starting the actors, injecting their clients, and shutdown.
pub struct StorefrontSystem {
    pub catalog: CatalogClient,
    pub ledger: LedgerClient,
    pub orders: OrderClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Spawn the store actors and build the order client. Must be called
    /// from within a tokio runtime.
    #[instrument(name = "storefront_system", skip(config), fields(policy = ?config.reservation_policy))]
    pub fn start(config: &StorefrontConfig) -> Self {
        info!("Starting storefront system");

        let (catalog_actor, catalog) = CatalogClient::start(config.actor_buffer);
        let (ledger_actor, ledger) = LedgerClient::start(config.actor_buffer);
        let handles = vec![tokio::spawn(catalog_actor.run()), tokio::spawn(ledger_actor.run())];

        let orders = OrderClient::new(
            catalog.clone(),
            ledger.clone(),
            PricingEngine::new(&config.pricing),
            config.reservation_policy,
        );

        info!("Storefront system started");
        Self {
            catalog,
            ledger,
            orders,
            handles,
        }
    }

    /// Stop both actors and wait for them. Requests already queued are
    /// answered first.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down storefront system");

        self.ledger.shutdown().await?;
        self.catalog.shutdown().await?;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(SystemError::TaskFailed(e));
            }
        }

        info!("Storefront system shutdown complete");
        Ok(())
    }
}
