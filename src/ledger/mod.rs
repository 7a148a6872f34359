//! Order ledger: append-mostly store of placed orders.

mod entity;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::actor_framework::{ResourceActor, ResourceClient};
use crate::domain::{NewOrder, Order, OrderId, OrderPatch, OrderStatus, UserId};
use crate::error::LedgerError;

/// Client for interacting with the ledger actor.
#[derive(Clone)]
pub struct LedgerClient {
    inner: ResourceClient<Order>,
}

impl LedgerClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Build the ledger actor and its client. The caller spawns `run()`.
    pub fn start(buffer_size: usize) -> (ResourceActor<Order>, LedgerClient) {
        let (actor, inner) = ResourceActor::new("ledger", buffer_size, || Uuid::new_v4().to_string());
        (actor, LedgerClient::new(inner))
    }

    /// Persist a new order; the ledger assigns its id and timestamps.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total))]
    pub async fn insert(&self, order: NewOrder) -> Result<Order, LedgerError> {
        debug!("Sending request");
        let order = self.inner.create(order).await?;
        info!(order_id = %order.id, "Order recorded");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, LedgerError> {
        debug!("Sending request");
        self.inner.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, LedgerError> {
        debug!("Sending request");
        self.inner.update(id, OrderPatch { status }).await
    }

    /// All orders, or only those placed by `user_id`, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Option<UserId>) -> Result<Vec<Order>, LedgerError> {
        debug!("Sending request");
        let mut orders = self
            .inner
            .list(move |order: &Order| match &user_id {
                Some(user_id) => order.user_id.as_ref() == Some(user_id),
                None => true,
            })
            .await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), LedgerError> {
        debug!("Sending shutdown request");
        self.inner.shutdown().await
    }
}
