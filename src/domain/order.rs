use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderId, ProductId, UserId};

closed_enum! {
    /// How the customer receives the order.
    DeliveryMethod, "delivery method" {
        ShipToAddress => "ship-to-address",
        Pickup => "pickup",
    }
}

closed_enum! {
    /// Order lifecycle: Pending → Processing → Completed, or → Cancelled.
    #[derive(Default)]
    OrderStatus, "order status" {
        #[default]
        Pending => "Pending",
        Processing => "Processing",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

/// Priced snapshot of a product as it was when the order was placed.
///
/// Holds copies of the name and price, never a reference to the live listing,
/// so later catalog edits or deletions leave historical orders unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl OrderLineItem {
    /// `unit_price × quantity`, or `None` when the product does not fit in a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Delivery selection. Date and time are opaque scheduling strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub method: DeliveryMethod,
    pub address: String,
    pub date: String,
    pub time: String,
}

/// A placed order. Only `status` and `updated_at` change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerInfo,
    pub delivery: Delivery,
    pub items: Vec<OrderLineItem>,
    pub total: Decimal,
    pub note: String,
    pub status: OrderStatus,
    /// `None` for guest orders.
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload the ledger turns into an [`Order`] by assigning id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer: CustomerInfo,
    pub delivery: Delivery,
    pub items: Vec<OrderLineItem>,
    pub total: Decimal,
    pub note: String,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPatch {
    pub status: OrderStatus,
}
