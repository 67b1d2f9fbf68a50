//! End-to-end checkout against the in-process order book

use std::sync::Arc;

use dishcart::prelude::*;
use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

const MENU: &str = r"
restaurants:
  - id: pizza-palace
    name: Pizza Palace
    items:
      - { id: 1, name: Margherita, price: 10.00 GBP, image: margherita.jpg }
      - { id: 2, name: Garlic Bread, price: 3.50 GBP }
  - id: noodle-bar
    name: Noodle Bar
    items:
      - { id: 1, name: Ramen, price: 11.00 GBP }
";

fn address() -> DeliveryAddress {
    DeliveryAddress {
        street: "1 High Street".to_string(),
        city: "London".to_string(),
        state: "Greater London".to_string(),
        zip_code: "N1 1AA".to_string(),
    }
}

#[tokio::test]
async fn checkout_all_places_one_order_per_restaurant() -> TestResult {
    let menu = Arc::new(Menu::from_yaml(MENU)?);
    let book = LocalOrderBook::with_standard_pricing(Arc::clone(&menu));
    let mut cart = Cart::new(menu.currency());

    cart.add_item(menu.candidate(&LineKey::new(1, "pizza-palace"))?)?;
    cart.add_item(menu.candidate(&LineKey::new(1, "pizza-palace"))?)?;
    cart.add_item(menu.candidate(&LineKey::new(2, "pizza-palace"))?)?;
    cart.add_item(menu.candidate(&LineKey::new(1, "noodle-bar"))?)?;

    let report = submit_checkout(&book, &mut cart, &CheckoutScope::All, &address()).await?;

    assert!(report.is_complete());
    assert!(cart.is_empty());

    let orders = book.orders().await;
    let totals: Vec<(String, i64)> = orders
        .iter()
        .map(|order| {
            (
                order.restaurant_id.to_string(),
                order.quote.total.to_minor_units(),
            )
        })
        .collect();

    // 23.50 + 2.35 tax + 5.00 delivery; 11.00 + 1.10 tax + 5.00 delivery
    assert_eq!(
        totals,
        vec![
            ("noodle-bar".to_string(), 17_10),
            ("pizza-palace".to_string(), 30_85),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn checkout_one_restaurant_keeps_the_rest() -> TestResult {
    let menu = Arc::new(Menu::from_yaml(MENU)?);
    let book = LocalOrderBook::with_standard_pricing(Arc::clone(&menu));
    let mut cart = Cart::new(menu.currency());

    cart.add_item(menu.candidate(&LineKey::new(1, "pizza-palace"))?)?;
    cart.add_item(menu.candidate(&LineKey::new(1, "noodle-bar"))?)?;

    let scope = CheckoutScope::Restaurant(RestaurantId::from("noodle-bar"));
    let report = submit_checkout(&book, &mut cart, &scope, &address()).await?;

    assert_eq!(report.placed().count(), 1);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.grand_total()?, Money::from_minor(10_00, GBP));
    assert_eq!(
        cart.checkout_offer()?,
        CheckoutOffer::Combined {
            restaurant: RestaurantId::from("pizza-palace"),
            total: Money::from_minor(10_00, GBP),
        }
    );

    Ok(())
}

#[tokio::test]
async fn placed_order_can_be_cancelled_until_delivered() -> TestResult {
    let menu = Arc::new(Menu::from_yaml(MENU)?);
    let book = LocalOrderBook::with_standard_pricing(Arc::clone(&menu));
    let mut cart = Cart::new(menu.currency());

    cart.add_item(menu.candidate(&LineKey::new(2, "pizza-palace"))?)?;

    let report = submit_checkout(&book, &mut cart, &CheckoutScope::All, &address()).await?;
    let (_, placed) = report.placed().next().ok_or("no order placed")?;

    let cancelled = book.cancel(placed.uuid).await?;

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(book.cancel(placed.uuid).await.is_err());

    Ok(())
}

#[tokio::test]
async fn restaurant_missing_from_order_menu_fails_alone() -> TestResult {
    let browsing = Menu::from_yaml(MENU)?;
    let ordering = Menu::from_yaml(
        r"
restaurants:
  - id: pizza-palace
    name: Pizza Palace
    items:
      - { id: 1, name: Margherita, price: 9.00 GBP }
",
    )?;
    let book = LocalOrderBook::with_standard_pricing(Arc::new(ordering));
    let mut cart = Cart::new(browsing.currency());

    cart.add_item(browsing.candidate(&LineKey::new(1, "pizza-palace"))?)?;
    cart.add_item(browsing.candidate(&LineKey::new(1, "noodle-bar"))?)?;

    let report = submit_checkout(&book, &mut cart, &CheckoutScope::All, &address()).await?;

    assert!(!report.is_complete());
    assert_eq!(report.placed().count(), 1);
    assert_eq!(report.failed().count(), 1);

    // charged at the order menu's 9.00, not the 10.00 shown when browsing
    let orders = book.orders().await;
    let order = orders.first().ok_or("no order placed")?;

    assert_eq!(order.quote.subtotal, Money::from_minor(9_00, GBP));

    assert_eq!(cart.len(), 1);
    assert!(cart.get(&LineKey::new(1, "noodle-bar")).is_some());

    Ok(())
}
