//! Full-system tests: real catalog and ledger actors behind a
//! `StorefrontSystem`, driven through the order client.

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::app_system::StorefrontSystem;
    use crate::config::{ReservationPolicy, StorefrontConfig};
    use crate::domain::{
        Category, DeliveryMethod, OrderStatus, PlaceOrderRequest, Product, ProductCreate, ProductPatch,
    };
    use crate::error::OrderError;

    fn start(policy: ReservationPolicy) -> StorefrontSystem {
        let config = StorefrontConfig {
            reservation_policy: policy,
            ..StorefrontConfig::default()
        };
        StorefrontSystem::start(&config)
    }

    async fn seed(system: &StorefrontSystem, name: &str, price: i64, stock: u32) -> Product {
        system
            .catalog
            .create_product(ProductCreate::new(
                name,
                Decimal::from(price),
                stock,
                Category::Cookies,
                "https://cdn.example.com/item.png",
            ))
            .await
            .unwrap()
    }

    async fn stock_of(system: &StorefrontSystem, id: &str) -> u32 {
        system.catalog.get_product(id.to_string()).await.unwrap().unwrap().stock
    }

    fn pickup_request() -> PlaceOrderRequest {
        PlaceOrderRequest::new(
            "Ines",
            " Ines@Example.COM ",
            "555-0100",
            DeliveryMethod::Pickup,
            "2026-11-02",
            "11:30",
        )
    }

    #[tokio::test]
    async fn test_pickup_order_reserves_stock_and_records_pending() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 10, 5).await;

        let order = system
            .orders
            .place_order(pickup_request().with_item(cookie.id.clone(), 2))
            .await
            .unwrap();

        assert_eq!(order.total, Decimal::from(20));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer.email, "ines@example.com");
        assert_eq!(order.delivery.address, "In-store pickup");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Cookie");
        assert_eq!(order.items[0].unit_price, Decimal::from(10));
        assert_eq!(stock_of(&system, &cookie.id).await, 3);

        let stored = system.orders.get_order(order.id.clone()).await.unwrap();
        assert_eq!(stored, Some(order));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_system_starts_with_zero_actor_buffer() {
        let config = StorefrontConfig {
            actor_buffer: 0,
            ..StorefrontConfig::default()
        };
        let system = StorefrontSystem::start(&config);
        let cookie = seed(&system, "Cookie", 10, 5).await;

        system
            .orders
            .place_order(pickup_request().with_item(cookie.id.clone(), 1))
            .await
            .unwrap();
        assert_eq!(stock_of(&system, &cookie.id).await, 4);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_ship_order_adds_delivery_fee() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 10, 5).await;
        let brownie = seed(&system, "Brownie", 4, 5).await;

        let request = PlaceOrderRequest::new(
            "Ines",
            "ines@example.com",
            "555-0100",
            DeliveryMethod::ShipToAddress,
            "2026-11-02",
            "11:30",
        )
        .with_address("  8 Rue Cler ")
        .with_item(cookie.id.clone(), 1)
        .with_item(brownie.id.clone(), 3);

        let order = system.orders.place_order(request).await.unwrap();
        assert_eq!(order.total, Decimal::from(10 + 12 + 7));
        assert_eq!(order.delivery.address, "8 Rue Cler");

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_everything_untouched() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 10, 5).await;

        let result = system
            .orders
            .place_order(pickup_request().with_item(cookie.id.clone(), 10))
            .await;

        assert_eq!(
            result,
            Err(OrderError::InsufficientStock { name: "Cookie".into(), available: 5 })
        );
        assert_eq!(stock_of(&system, &cookie.id).await, 5);
        assert!(system.orders.list_orders(None).await.unwrap().is_empty());

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_requests_touch_no_store() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 10, 5).await;

        let empty = system.orders.place_order(pickup_request()).await;
        assert_eq!(empty, Err(OrderError::EmptyCart));

        let no_address = PlaceOrderRequest::new(
            "Ines",
            "ines@example.com",
            "555-0100",
            DeliveryMethod::ShipToAddress,
            "2026-11-02",
            "11:30",
        )
        .with_item(cookie.id.clone(), 1);
        assert_eq!(
            system.orders.place_order(no_address).await,
            Err(OrderError::MissingDeliveryAddress)
        );

        let bad_line = pickup_request()
            .with_item(cookie.id.clone(), 1)
            .with_item(cookie.id.clone(), 0);
        assert_eq!(
            system.orders.place_order(bad_line).await,
            Err(OrderError::InvalidLineItem { index: 1 })
        );

        let unknown = pickup_request().with_item("no-such-product", 1);
        assert_eq!(
            system.orders.place_order(unknown).await,
            Err(OrderError::ProductNotFound { id: "no-such-product".into() })
        );

        assert_eq!(stock_of(&system, &cookie.id).await, 5);
        assert!(system.orders.list_orders(None).await.unwrap().is_empty());

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_survives_catalog_edits() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 10, 5).await;
        let order = system
            .orders
            .place_order(pickup_request().with_item(cookie.id.clone(), 1))
            .await
            .unwrap();

        let patch = ProductPatch {
            name: Some("Giant Cookie".into()),
            price: Some(Decimal::from(15)),
            ..ProductPatch::default()
        };
        system.catalog.update_product(cookie.id.clone(), patch).await.unwrap();

        let views = system.orders.list_orders(None).await.unwrap();
        assert_eq!(views.len(), 1);
        let line = &views[0].lines[0];
        assert_eq!(line.snapshot.name, "Cookie");
        assert_eq!(line.snapshot.unit_price, Decimal::from(10));
        let current = line.current.as_ref().unwrap();
        assert_eq!(current.name, "Giant Cookie");
        assert_eq!(current.price, Decimal::from(15));

        system.catalog.delete_product(cookie.id.clone()).await.unwrap();

        let stored = system.orders.get_order(order.id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.items[0].name, "Cookie");
        assert_eq!(stored.total, Decimal::from(10));
        let views = system.orders.list_orders(None).await.unwrap();
        assert_eq!(views[0].lines[0].current, None);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_status_changes() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 10, 5).await;
        let order = system
            .orders
            .place_order(pickup_request().with_item(cookie.id.clone(), 2))
            .await
            .unwrap();

        let completed = system.orders.set_status(order.id.clone(), "Completed").await.unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);

        assert_eq!(
            system.orders.set_status(order.id.clone(), "Shipped").await,
            Err(OrderError::InvalidStatus("Shipped".into()))
        );
        assert_eq!(
            system.orders.set_status("missing".into(), "Processing").await,
            Err(OrderError::OrderNotFound("missing".into()))
        );

        // Cancelling does not return stock.
        system.orders.set_status(order.id.clone(), "Cancelled").await.unwrap();
        assert_eq!(stock_of(&system, &cookie.id).await, 3);

        let stored = system.orders.get_order(order.id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);

        system.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_placements_never_oversell() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 2, 10).await;

        let mut tasks = Vec::new();
        for _ in 0..25 {
            let orders = system.orders.clone();
            let request = pickup_request().with_item(cookie.id.clone(), 1);
            tasks.push(tokio::spawn(async move { orders.place_order(request).await }));
        }

        let mut placed = 0;
        let mut rejected = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => placed += 1,
                Err(OrderError::InsufficientStock { .. }) => rejected += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(placed, 10);
        assert_eq!(rejected, 15);
        assert_eq!(stock_of(&system, &cookie.id).await, 0);
        assert_eq!(system.orders.list_orders(None).await.unwrap().len(), 10);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_earlier_lines_by_default() {
        let system = start(ReservationPolicy::KeepPartial);
        let a = seed(&system, "A", 3, 5).await;
        let b = seed(&system, "B", 3, 5).await;

        let request = pickup_request().with_item(a.id.clone(), 1).with_item(b.id.clone(), 99);
        let result = system.orders.place_order(request).await;

        assert_eq!(result, Err(OrderError::InsufficientStock { name: "B".into(), available: 5 }));
        assert_eq!(stock_of(&system, &a.id).await, 4);
        assert_eq!(stock_of(&system, &b.id).await, 5);
        assert!(system.orders.list_orders(None).await.unwrap().is_empty());

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_partial_failure_rolls_back_when_configured() {
        let system = start(ReservationPolicy::Rollback);
        let a = seed(&system, "A", 3, 5).await;
        let b = seed(&system, "B", 3, 5).await;

        let request = pickup_request().with_item(a.id.clone(), 1).with_item(b.id.clone(), 99);
        let result = system.orders.place_order(request).await;

        assert_eq!(result, Err(OrderError::InsufficientStock { name: "B".into(), available: 5 }));
        assert_eq!(stock_of(&system, &a.id).await, 5);
        assert_eq!(stock_of(&system, &b.id).await, 5);

        system.shutdown().await.unwrap();
    }

    async fn seed_priced(system: &StorefrontSystem, price: Decimal, stock: u32) -> Product {
        system
            .catalog
            .create_product(ProductCreate::new(
                "Gold Cookie",
                price,
                stock,
                Category::Cookies,
                "https://cdn.example.com/gold.png",
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected_and_rolled_back() {
        let system = start(ReservationPolicy::Rollback);
        let gold = seed_priced(&system, Decimal::MAX, 5).await;

        let result = system
            .orders
            .place_order(pickup_request().with_item(gold.id.clone(), 2))
            .await;

        assert_eq!(result, Err(OrderError::TotalOverflow));
        assert_eq!(stock_of(&system, &gold.id).await, 5);
        assert!(system.orders.list_orders(None).await.unwrap().is_empty());

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_overflowing_total_keeps_stock_by_default() {
        let system = start(ReservationPolicy::KeepPartial);
        let gold = seed_priced(&system, Decimal::MAX, 5).await;

        let result = system
            .orders
            .place_order(pickup_request().with_item(gold.id.clone(), 2))
            .await;

        assert_eq!(result, Err(OrderError::TotalOverflow));
        assert_eq!(stock_of(&system, &gold.id).await, 3);
        assert!(system.orders.list_orders(None).await.unwrap().is_empty());

        let quote = system
            .orders
            .quote_order(&pickup_request().with_item(gold.id.clone(), 2))
            .await;
        assert_eq!(quote, Err(OrderError::TotalOverflow));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_quote_takes_no_stock() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 10, 5).await;

        let request = pickup_request().with_item(cookie.id.clone(), 3);
        let quote = system.orders.quote_order(&request).await.unwrap();
        assert_eq!(quote.subtotal, Decimal::from(30));
        assert_eq!(quote.surcharge, Decimal::ZERO);
        assert_eq!(quote.total, Decimal::from(30));
        assert_eq!(stock_of(&system, &cookie.id).await, 5);

        let split = pickup_request()
            .with_item(cookie.id.clone(), 3)
            .with_item(cookie.id.clone(), 3);
        assert_eq!(
            system.orders.quote_order(&split).await,
            Err(OrderError::InsufficientStock { name: "Cookie".into(), available: 2 })
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_list_orders_by_user_newest_first() {
        let system = start(ReservationPolicy::KeepPartial);
        let cookie = seed(&system, "Cookie", 10, 50).await;

        let first = system
            .orders
            .place_order(pickup_request().with_item(cookie.id.clone(), 1).for_user("u-1"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        system
            .orders
            .place_order(pickup_request().with_item(cookie.id.clone(), 1).for_user("u-2"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let third = system
            .orders
            .place_order(pickup_request().with_item(cookie.id.clone(), 2).for_user("u-1"))
            .await
            .unwrap();

        let mine = system.orders.list_orders(Some("u-1".into())).await.unwrap();
        let ids: Vec<_> = mine.iter().map(|view| view.order.id.clone()).collect();
        assert_eq!(ids, vec![third.id, first.id]);
        assert_eq!(mine[0].lines[0].current.as_ref().unwrap().name, "Cookie");

        assert_eq!(system.orders.list_orders(None).await.unwrap().len(), 3);
        assert!(system.orders.list_orders(Some("u-3".into())).await.unwrap().is_empty());

        system.shutdown().await.unwrap();
    }
}
