//! Catalog store: product listings and the per-product stock counters.
//!
//! All state lives in a [`ResourceActor<Product>`]; every stock change is a
//! message processed one at a time by that actor.

mod actions;
mod entity;

pub use actions::StockAction;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::actor_framework::{ResourceActor, ResourceClient};
use crate::domain::{Category, Product, ProductCreate, ProductId, ProductPatch};
use crate::error::CatalogError;

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Product>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    /// Build the catalog actor and its client. The caller spawns `run()`.
    pub fn start(buffer_size: usize) -> (ResourceActor<Product>, CatalogClient) {
        let (actor, inner) = ResourceActor::new("catalog", buffer_size, || Uuid::new_v4().to_string());
        (actor, CatalogClient::new(inner))
    }

    #[instrument(skip(self, payload), fields(product_name = %payload.name))]
    pub async fn create_product(&self, payload: ProductCreate) -> Result<Product, CatalogError> {
        debug!("Sending request");
        let product = self.inner.create(payload).await?;
        info!(product_id = %product.id, stock = product.stock, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        debug!("Sending request");
        self.inner.get(id).await
    }

    /// All listings, or one category, newest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<Category>) -> Result<Vec<Product>, CatalogError> {
        debug!("Sending request");
        let mut products = self
            .inner
            .list(move |product: &Product| category.map_or(true, |c| product.category == c))
            .await?;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }

    /// Remove a listing. Orders already placed keep their own snapshot.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        debug!("Sending request");
        let removed = self.inner.delete(id).await?;
        info!(product_name = %removed.name, "Product deleted");
        Ok(removed)
    }

    /// Atomically take `quantity` units if at least that many remain.
    ///
    /// Returns the product as it stands after the decrement.
    #[instrument(skip(self))]
    pub async fn decrement_stock_if_sufficient(
        &self,
        id: ProductId,
        quantity: u32,
    ) -> Result<Product, CatalogError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, StockAction::DecrementIfSufficient(quantity))
            .await
    }

    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: ProductId, quantity: u32) -> Result<Product, CatalogError> {
        debug!("Sending request");
        self.inner.perform_action(id, StockAction::Release(quantity)).await
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CatalogError> {
        debug!("Sending shutdown request");
        self.inner.shutdown().await
    }
}
