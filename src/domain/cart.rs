use serde::{Deserialize, Serialize};

use super::{DeliveryMethod, ProductId, UserId};

/// A requested (product, quantity) pair as submitted by the caller.
///
/// Untrusted: both fields may be missing and the quantity may be zero or
/// negative. The pricing engine rejects such lines before any stock moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartLine {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i64>,
}

impl CartLine {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: Some(product_id.into()),
            quantity: Some(quantity),
        }
    }
}

/// Raw place-order input. Missing text fields deserialize as `None` so that
/// the engine, not the decoder, reports which field is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceOrderRequest {
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub delivery_method: Option<DeliveryMethod>,
    pub delivery_address: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<String>,
    pub note: Option<String>,
    pub items: Vec<CartLine>,
    pub user_id: Option<UserId>,
}

impl PlaceOrderRequest {
    pub fn new(
        customer_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        delivery_method: DeliveryMethod,
        delivery_date: impl Into<String>,
        delivery_time: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: Some(customer_name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            delivery_method: Some(delivery_method),
            delivery_date: Some(delivery_date.into()),
            delivery_time: Some(delivery_time.into()),
            ..Self::default()
        }
    }

    pub fn with_item(mut self, product_id: impl Into<ProductId>, quantity: i64) -> Self {
        self.items.push(CartLine::new(product_id, quantity));
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.delivery_address = Some(address.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn for_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
