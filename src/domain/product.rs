use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

closed_enum! {
    /// Storefront shelf a product is listed under.
    Category, "category" {
        Cookies => "Cookies",
        MiniCookies => "mini-cookies",
        Brownies => "brownies",
    }
}

closed_enum! {
    /// Promotional label shown next to a listing. Display only, no pricing effect.
    Badge, "badge" {
        BestSeller => "Best Seller",
        Popular => "Popular",
        FewStocksLeft => "Few stocks left",
    }
}

/// A catalog listing. Stock is only ever changed through the catalog's
/// conditional decrement, its release, or an explicit catalog edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: Category,
    pub badge: Option<Badge>,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: Category,
    #[serde(default)]
    pub badge: Option<Badge>,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
}

impl ProductCreate {
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        stock: u32,
        category: Category,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
            category,
            badge: None,
            description: String::new(),
            image_url: image_url.into(),
        }
    }
}

/// Partial update of a listing. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// `Some(None)` clears the badge; an explicit JSON `null` decodes to that.
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub badge: Option<Option<Badge>>,
}

/// Maps a field that is present in the input, including `null`, to `Some`.
/// Absent fields fall back to the struct default of `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Accepts inline data URIs for images and anything served over http(s).
pub fn is_valid_image_url(url: &str) -> bool {
    url.starts_with("data:image/") || url.starts_with("http")
}
