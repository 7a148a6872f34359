use chrono::Utc;
use tracing::{debug, warn};

use super::actions::StockAction;
use crate::actor_framework::Entity;
use crate::domain::{is_valid_image_url, Product, ProductCreate, ProductId, ProductPatch};
use crate::error::CatalogError;

impl Entity for Product {
    type Id = ProductId;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = StockAction;
    /// Snapshot of the product after the action applied.
    type ActionResult = Product;
    type Error = CatalogError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Creates a listing, trimming the name and description.
    ///
    /// # Errors
    /// Rejects a blank name, a negative price, or an image URL that is neither
    /// a `data:image/` URI nor an http(s) link.
    fn from_create(id: ProductId, payload: ProductCreate) -> Result<Self, CatalogError> {
        let name = payload.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::InvalidProduct("name is required".into()));
        }
        if payload.price.is_sign_negative() {
            return Err(CatalogError::InvalidProduct(format!("negative price {}", payload.price)));
        }
        if !is_valid_image_url(&payload.image_url) {
            return Err(CatalogError::InvalidProduct("invalid image".into()));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            name,
            price: payload.price,
            stock: payload.stock,
            category: payload.category,
            badge: payload.badge,
            description: payload.description.trim().to_string(),
            image_url: payload.image_url,
            created_at: now,
            updated_at: now,
        })
    }

    fn not_found(id: &ProductId) -> CatalogError {
        CatalogError::NotFound(id.clone())
    }

    /// Applies only the fields present in the patch. The whole patch is
    /// checked before anything is written, so a rejected patch changes nothing.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), CatalogError> {
        if let Some(price) = patch.price {
            if price.is_sign_negative() {
                return Err(CatalogError::InvalidProduct(format!("negative price {}", price)));
            }
        }
        if let Some(url) = &patch.image_url {
            if !is_valid_image_url(url) {
                return Err(CatalogError::InvalidProduct("invalid image".into()));
            }
        }
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(CatalogError::InvalidProduct("name is required".into()));
            }
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(url) = patch.image_url {
            self.image_url = url;
        }
        if let Some(badge) = patch.badge {
            self.badge = badge;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, action: StockAction) -> Result<Product, CatalogError> {
        match action {
            StockAction::DecrementIfSufficient(quantity) => {
                if self.stock < quantity {
                    warn!(
                        product_id = %self.id,
                        available = self.stock,
                        requested = quantity,
                        "Insufficient stock"
                    );
                    return Err(CatalogError::InsufficientStock {
                        name: self.name.clone(),
                        requested: quantity,
                        available: self.stock,
                    });
                }
                self.stock -= quantity;
                debug!(product_id = %self.id, remaining_stock = self.stock, "Stock decremented");
            }
            StockAction::Release(quantity) => {
                self.stock = self.stock.saturating_add(quantity);
                debug!(product_id = %self.id, remaining_stock = self.stock, "Stock released");
            }
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}
