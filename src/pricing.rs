//! Pricing & validation engine.
//!
//! Turns an untrusted [`PlaceOrderRequest`] into a priced order payload or a
//! specific [`OrderError`]. The engine reads the catalog but never changes
//! stock; the orchestrator in [`crate::orders`] interleaves the individual
//! steps below with the catalog's conditional decrement.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::catalog::CatalogClient;
use crate::config::PricingConfig;
use crate::domain::{
    CartLine, CustomerInfo, Delivery, DeliveryMethod, NewOrder, OrderLineItem, PlaceOrderRequest, Product,
    ProductId, UserId,
};
use crate::error::OrderError;

/// A cart line that passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A request whose fields passed structural validation, normalized for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub customer: CustomerInfo,
    pub delivery: Delivery,
    pub note: String,
    pub user_id: Option<UserId>,
    pub lines: Vec<LineRequest>,
}

/// Fully priced order, ready to be written to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedOrder {
    pub customer: CustomerInfo,
    pub delivery: Delivery,
    pub note: String,
    pub user_id: Option<UserId>,
    pub items: Vec<OrderLineItem>,
    pub subtotal: Decimal,
    pub surcharge: Decimal,
    pub total: Decimal,
}

impl PricedOrder {
    pub fn into_new_order(self) -> NewOrder {
        NewOrder {
            customer: self.customer,
            delivery: self.delivery,
            items: self.items,
            total: self.total,
            note: self.note,
            user_id: self.user_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PricingEngine {
    delivery_fee: Decimal,
    pickup_address: String,
}

impl PricingEngine {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            delivery_fee: config.delivery_fee,
            pickup_address: config.pickup_address.clone(),
        }
    }

    /// Structural validation: required fields, non-empty cart, delivery
    /// address rule and the shape of every cart line. Touches no store.
    pub fn validate(&self, request: &PlaceOrderRequest) -> Result<ValidatedOrder, OrderError> {
        let name = required(&request.customer_name, "customer_name")?;
        let email = required(&request.email, "email")?;
        let phone = required_verbatim(&request.phone, "phone")?;
        let method = request.delivery_method.ok_or(OrderError::MissingField("delivery_method"))?;
        let date = required_verbatim(&request.delivery_date, "delivery_date")?;
        let time = required_verbatim(&request.delivery_time, "delivery_time")?;

        if request.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let address = match method {
            DeliveryMethod::ShipToAddress => {
                non_blank(&request.delivery_address).ok_or(OrderError::MissingDeliveryAddress)?
            }
            DeliveryMethod::Pickup => self.pickup_address.clone(),
        };

        let lines = request
            .items
            .iter()
            .enumerate()
            .map(|(index, line)| validate_line(index, line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedOrder {
            customer: CustomerInfo {
                name,
                email: email.to_lowercase(),
                phone,
            },
            delivery: Delivery {
                method,
                address,
                date,
                time,
            },
            note: non_blank(&request.note).unwrap_or_default(),
            user_id: request.user_id.clone().filter(|id| !id.trim().is_empty()),
            lines,
        })
    }

    /// Fails with `InsufficientStock` when `requested` exceeds the product's
    /// current stock.
    pub fn check_availability(&self, product: &Product, requested: u32) -> Result<(), OrderError> {
        ensure_available(&product.name, product.stock, requested)
    }

    /// Snapshot `product` into an order line at its current price.
    pub fn price_line(&self, product: &Product, quantity: u32) -> OrderLineItem {
        OrderLineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        }
    }

    pub fn surcharge(&self, method: DeliveryMethod) -> Decimal {
        match method {
            DeliveryMethod::ShipToAddress => self.delivery_fee,
            DeliveryMethod::Pickup => Decimal::ZERO,
        }
    }

    /// Attach priced lines to a validated order and compute the totals.
    ///
    /// # Errors
    /// `TotalOverflow` when a line total, the subtotal or the total does not
    /// fit in a `Decimal`.
    pub fn finalize(&self, order: ValidatedOrder, items: Vec<OrderLineItem>) -> Result<PricedOrder, OrderError> {
        let subtotal = items.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.line_total().and_then(|line| acc.checked_add(line))
        });
        let subtotal = subtotal.ok_or(OrderError::TotalOverflow)?;
        let surcharge = self.surcharge(order.delivery.method);
        let total = subtotal.checked_add(surcharge).ok_or(OrderError::TotalOverflow)?;
        Ok(PricedOrder {
            customer: order.customer,
            delivery: order.delivery,
            note: order.note,
            user_id: order.user_id,
            items,
            subtotal,
            surcharge,
            total,
        })
    }

    /// Validate and price a request against the live catalog without taking
    /// any stock. Lines naming the same product are checked against their
    /// combined demand, as they would be when the order is actually placed.
    #[instrument(skip(self, catalog, request), fields(items = request.items.len()))]
    pub async fn validate_and_price(
        &self,
        catalog: &CatalogClient,
        request: &PlaceOrderRequest,
    ) -> Result<PricedOrder, OrderError> {
        let order = self.validate(request)?;
        let mut claimed: HashMap<ProductId, u32> = HashMap::new();
        let mut items = Vec::with_capacity(order.lines.len());

        for line in &order.lines {
            let product = catalog
                .get_product(line.product_id.clone())
                .await?
                .ok_or_else(|| OrderError::ProductNotFound { id: line.product_id.clone() })?;

            let already = claimed.entry(product.id.clone()).or_insert(0);
            ensure_available(&product.name, product.stock.saturating_sub(*already), line.quantity)?;
            *already += line.quantity;

            items.push(self.price_line(&product, line.quantity));
        }

        let priced = self.finalize(order, items)?;
        debug!(total = %priced.total, "Order priced");
        Ok(priced)
    }
}

/// Reject lines with a missing product, a missing quantity, or a quantity < 1.
pub fn validate_line(index: usize, line: &CartLine) -> Result<LineRequest, OrderError> {
    let invalid = || OrderError::InvalidLineItem { index };
    let product_id = non_blank(&line.product_id).ok_or_else(invalid)?;
    let quantity = line
        .quantity
        .filter(|q| *q >= 1)
        .and_then(|q| u32::try_from(q).ok())
        .ok_or_else(invalid)?;
    Ok(LineRequest { product_id, quantity })
}

fn ensure_available(name: &str, available: u32, requested: u32) -> Result<(), OrderError> {
    if requested > available {
        return Err(OrderError::InsufficientStock {
            name: name.to_string(),
            available,
        });
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, OrderError> {
    non_blank(value).ok_or(OrderError::MissingField(field))
}

/// Like [`required`], but keeps the value exactly as submitted.
fn required_verbatim(value: &Option<String>, field: &'static str) -> Result<String, OrderError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(OrderError::MissingField(field)),
    }
}
