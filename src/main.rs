use rust_decimal::Decimal;
use tracing::{error, info, warn, Instrument};

use storefront_orders::app_system::{setup_tracing, StorefrontSystem};
use storefront_orders::config::StorefrontConfig;
use storefront_orders::domain::{Badge, Category, DeliveryMethod, PlaceOrderRequest, ProductCreate};
use storefront_orders::error::OrderError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StorefrontConfig::load()?;
    setup_tracing(&config.log_filter);

    info!(?config, "Starting storefront demo");
    let system = StorefrontSystem::start(&config);

    let span = tracing::info_span!("catalog_seed");
    let (cookie, brownie) = async {
        let mut cookie = ProductCreate::new(
            "Chocolate chip cookie",
            Decimal::new(350, 2),
            12,
            Category::Cookies,
            "https://cdn.example.com/cookie.png",
        );
        cookie.badge = Some(Badge::BestSeller);
        let cookie = system.catalog.create_product(cookie).await?;

        let brownie = ProductCreate::new(
            "Fudge brownie",
            Decimal::new(425, 2),
            3,
            Category::Brownies,
            "https://cdn.example.com/brownie.png",
        );
        let brownie = system.catalog.create_product(brownie).await?;
        anyhow::Ok((cookie, brownie))
    }
    .instrument(span)
    .await?;

    info!(cookie_id = %cookie.id, brownie_id = %brownie.id, "Catalog seeded");

    let pickup = PlaceOrderRequest::new(
        "Nour Haddad",
        "Nour@Example.com ",
        "555-0101",
        DeliveryMethod::Pickup,
        "2026-10-20",
        "10:00",
    )
    .with_item(cookie.id.clone(), 4)
    .with_note("No nuts please");

    let quote = system.orders.quote_order(&pickup).await?;
    info!(total = %quote.total, "Quoted pickup order");

    let pickup_order = system.orders.place_order(pickup).await?;
    info!(order_id = %pickup_order.id, total = %pickup_order.total, "Pickup order placed");

    let shipped = PlaceOrderRequest::new(
        "Sam Okafor",
        "sam@example.com",
        "555-0199",
        DeliveryMethod::ShipToAddress,
        "2026-10-21",
        "14:00",
    )
    .with_address("12 Baker Street")
    .with_item(cookie.id.clone(), 2)
    .with_item(brownie.id.clone(), 1)
    .for_user("user-42");

    let shipped_order = system.orders.place_order(shipped).await?;
    info!(order_id = %shipped_order.id, total = %shipped_order.total, "Delivery order placed");

    let greedy = PlaceOrderRequest::new(
        "Alex Martin",
        "alex@example.com",
        "555-0123",
        DeliveryMethod::Pickup,
        "2026-10-21",
        "16:00",
    )
    .with_item(brownie.id.clone(), 10);

    match system.orders.place_order(greedy).await {
        Err(OrderError::InsufficientStock { name, available }) => {
            warn!(%name, available, "Order rejected for insufficient stock");
        }
        Err(e) => error!(error = %e, "Unexpected order failure"),
        Ok(order) => error!(order_id = %order.id, "Oversized order was accepted"),
    }

    let completed = system
        .orders
        .set_status(pickup_order.id.clone(), "Completed")
        .await?;
    info!(order_id = %completed.id, status = %completed.status, "Order status updated");

    if let Err(e) = system.orders.set_status(shipped_order.id.clone(), "Shipped").await {
        warn!(error = %e, "Status change rejected");
    }

    for view in system.orders.list_orders(None).await? {
        info!(
            order_id = %view.order.id,
            status = %view.order.status,
            lines = view.lines.len(),
            total = %view.order.total,
            "Listed order"
        );
    }

    let remaining = system.catalog.get_product(cookie.id.clone()).await?;
    if let Some(product) = remaining {
        info!(product = %product.name, stock = product.stock, "Remaining stock");
    }

    system.shutdown().await?;
    info!("Storefront demo complete");
    Ok(())
}
