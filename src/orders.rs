//! Order placement orchestrator.
//!
//! [`OrderClient`] runs on the caller's task and coordinates the catalog and
//! ledger actors. Clones share nothing mutable, so any number of placements
//! can run at once; the only contended state, each product's stock counter,
//! is guarded by the catalog actor's conditional decrement.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::CatalogClient;
use crate::config::ReservationPolicy;
use crate::domain::{Order, OrderId, OrderLineItem, OrderStatus, PlaceOrderRequest, Product, ProductId, UserId};
use crate::error::OrderError;
use crate::ledger::LedgerClient;
use crate::pricing::{LineRequest, PricedOrder, PricingEngine};

/// Current catalog data shown next to a historical line when listing orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogDetails {
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
}

impl From<&Product> for CatalogDetails {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    /// What was bought, exactly as recorded at purchase time.
    pub snapshot: OrderLineItem,
    /// `None` when the product no longer exists or the catalog could not be read.
    pub current: Option<CatalogDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub order: Order,
    pub lines: Vec<LineView>,
}

/// Client for placing and managing orders.
#[derive(Clone)]
pub struct OrderClient {
    catalog: CatalogClient,
    ledger: LedgerClient,
    pricing: Arc<PricingEngine>,
    policy: ReservationPolicy,
}

impl OrderClient {
    pub fn new(
        catalog: CatalogClient,
        ledger: LedgerClient,
        pricing: PricingEngine,
        policy: ReservationPolicy,
    ) -> Self {
        Self {
            catalog,
            ledger,
            pricing: Arc::new(pricing),
            policy,
        }
    }

    /// Place an order.
    ///
    /// 1. Structural validation; nothing is touched on failure.
    /// 2. Per line, in cart order: look up, check, conditionally decrement,
    ///    price from the post-decrement snapshot.
    /// 3. Record the order as `Pending` in the ledger.
    ///
    /// When step 2 fails on a later line, or step 3 fails, stock taken for the
    /// earlier lines is handled according to the [`ReservationPolicy`].
    #[instrument(skip(self, request), fields(items = request.items.len(), user_id = ?request.user_id))]
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<Order, OrderError> {
        info!("Processing place_order request");

        let order = self.pricing.validate(&request).inspect_err(|e| {
            warn!(error = %e, "Order rejected by validation");
        })?;

        let mut reserved: Vec<&LineRequest> = Vec::with_capacity(order.lines.len());
        let mut items = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            match self.reserve_line(line).await {
                Ok(item) => {
                    reserved.push(line);
                    items.push(item);
                }
                Err(e) => {
                    error!(error = %e, product_id = %line.product_id, "Line reservation failed");
                    self.abandon(&reserved).await;
                    return Err(e);
                }
            }
        }

        info!(lines = items.len(), "Stock reserved for all lines");
        let lines = order.lines.clone();
        let priced = match self.pricing.finalize(order, items) {
            Ok(priced) => priced,
            Err(e) => {
                error!(error = %e, "Failed to total order");
                self.abandon(&lines.iter().collect::<Vec<_>>()).await;
                return Err(e);
            }
        };

        match self.ledger.insert(priced.into_new_order()).await {
            Ok(order) => {
                info!(order_id = %order.id, total = %order.total, "Order placed successfully");
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Failed to record order");
                self.abandon(&lines.iter().collect::<Vec<_>>()).await;
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, line), fields(product_id = %line.product_id, quantity = line.quantity))]
    async fn reserve_line(&self, line: &LineRequest) -> Result<OrderLineItem, OrderError> {
        let product = self
            .catalog
            .get_product(line.product_id.clone())
            .await?
            .ok_or_else(|| OrderError::ProductNotFound { id: line.product_id.clone() })?;

        self.pricing.check_availability(&product, line.quantity)?;

        // The lookup above may already be stale; only the conditional
        // decrement decides whether this line gets its stock.
        let snapshot = self
            .catalog
            .decrement_stock_if_sufficient(line.product_id.clone(), line.quantity)
            .await?;

        debug!(remaining_stock = snapshot.stock, "Line reserved");
        Ok(self.pricing.price_line(&snapshot, line.quantity))
    }

    /// Deal with stock already taken by a placement that will not complete.
    async fn abandon(&self, reserved: &[&LineRequest]) {
        if reserved.is_empty() {
            return;
        }

        match self.policy {
            ReservationPolicy::KeepPartial => {
                let products: Vec<&str> = reserved.iter().map(|line| line.product_id.as_str()).collect();
                warn!(?products, "Earlier lines remain decremented");
            }
            ReservationPolicy::Rollback => {
                for line in reserved.iter().rev() {
                    match self.catalog.release_stock(line.product_id.clone(), line.quantity).await {
                        Ok(product) => {
                            debug!(product_id = %line.product_id, remaining_stock = product.stock, "Stock released")
                        }
                        Err(e) => error!(
                            error = %e,
                            product_id = %line.product_id,
                            quantity = line.quantity,
                            "Failed to release stock"
                        ),
                    }
                }
            }
        }
    }

    /// Price a request against current stock without placing it.
    #[instrument(skip(self, request))]
    pub async fn quote_order(&self, request: &PlaceOrderRequest) -> Result<PricedOrder, OrderError> {
        self.pricing.validate_and_price(&self.catalog, request).await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        debug!("Processing get_order request");
        Ok(self.ledger.find_by_id(id).await?)
    }

    /// Overwrite an order's status. The text must name one of the four
    /// statuses; it is checked before the ledger is consulted. Stock is never
    /// touched, not even on cancellation.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: OrderId, status: &str) -> Result<Order, OrderError> {
        let status: OrderStatus = status
            .parse()
            .map_err(|_| OrderError::InvalidStatus(status.to_string()))?;

        let order = self.ledger.update_status(id, status).await?;
        info!(status = %order.status, "Order status updated");
        Ok(order)
    }

    /// All orders, or those of one user, newest first, each line paired with
    /// the product's current catalog data when it can still be found.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, user_id: Option<UserId>) -> Result<Vec<OrderView>, OrderError> {
        let orders = self.ledger.list(user_id).await?;
        let mut details: HashMap<ProductId, Option<CatalogDetails>> = HashMap::new();
        let mut views = Vec::with_capacity(orders.len());

        for order in orders {
            let mut lines = Vec::with_capacity(order.items.len());
            for item in &order.items {
                let current = match details.get(&item.product_id) {
                    Some(cached) => cached.clone(),
                    None => {
                        let fetched = self.current_details(&item.product_id).await;
                        details.insert(item.product_id.clone(), fetched.clone());
                        fetched
                    }
                };
                lines.push(LineView {
                    snapshot: item.clone(),
                    current,
                });
            }
            views.push(OrderView { order, lines });
        }

        info!(orders = views.len(), "Listed orders");
        Ok(views)
    }

    async fn current_details(&self, product_id: &ProductId) -> Option<CatalogDetails> {
        match self.catalog.get_product(product_id.clone()).await {
            Ok(Some(product)) => Some(CatalogDetails::from(&product)),
            Ok(None) => {
                debug!(product_id = %product_id, "Product no longer listed");
                None
            }
            Err(e) => {
                warn!(error = %e, product_id = %product_id, "Could not enrich order line");
                None
            }
        }
    }
}
