//! Table rendering for carts, checkout reports and orders.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    checkout::{CheckoutError, CheckoutOffer, CheckoutReport},
    orders::Order,
};

/// Errors that can occur when rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Cart totals could not be calculated.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout offer could not be calculated.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Writing to the output failed.
    #[error("failed to write output")]
    Io(#[from] io::Error),
}

/// Write the cart grouped by restaurant, followed by the checkout actions on offer.
///
/// # Errors
///
/// Returns a [`RenderError`] if totals cannot be calculated or the output cannot be written.
pub fn write_cart(out: &mut impl io::Write, cart: &Cart) -> Result<(), RenderError> {
    let groups = cart.groups()?;

    if groups.is_empty() {
        writeln!(out, "Your cart is empty")?;

        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Restaurant", "Item", "Qty", "Unit", "Line total"]);

    for group in &groups {
        for line in group.lines() {
            builder.push_record([
                group.restaurant().to_string(),
                line.name().to_string(),
                line.quantity().to_string(),
                line.unit_price().to_string(),
                line.line_total()?.to_string(),
            ]);
        }

        builder.push_record([
            String::new(),
            "Subtotal".to_string(),
            group.unit_count().to_string(),
            String::new(),
            group.subtotal().to_string(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::new(2..5), Alignment::right())
        .modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;

    match cart.checkout_offer()? {
        CheckoutOffer::Unavailable => {}
        CheckoutOffer::Combined { restaurant, total } => {
            writeln!(out, "Checkout ({restaurant}): {total}")?;
        }
        CheckoutOffer::Split { restaurants, total } => {
            for (restaurant, subtotal) in restaurants {
                writeln!(out, "Checkout {restaurant}: {subtotal}")?;
            }

            writeln!(out, "Checkout all restaurants: {total}")?;
        }
    }

    Ok(())
}

/// Write one row per restaurant showing whether its order was placed.
///
/// # Errors
///
/// Returns a [`RenderError::Io`] if the output cannot be written.
pub fn write_checkout_report(
    out: &mut impl io::Write,
    report: &CheckoutReport,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();
    builder.push_record(["Restaurant", "Result", "Order", "Total"]);

    for outcome in report.outcomes() {
        match &outcome.result {
            Ok(placed) => builder.push_record([
                outcome.restaurant.to_string(),
                "placed".to_string(),
                placed.uuid.to_string(),
                placed.quote.total.to_string(),
            ]),
            Err(error) => builder.push_record([
                outcome.restaurant.to_string(),
                "failed".to_string(),
                error.to_string(),
                String::new(),
            ]),
        }
    }

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::new(3..4), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write an order history table.
///
/// # Errors
///
/// Returns a [`RenderError::Io`] if the output cannot be written.
pub fn write_orders(out: &mut impl io::Write, orders: &[Order]) -> Result<(), RenderError> {
    let mut builder = Builder::default();
    builder.push_record(["Order", "Restaurant", "Status", "Subtotal", "Tax", "Delivery", "Total"]);

    for order in orders {
        builder.push_record([
            order.uuid.to_string(),
            order.restaurant_id.to_string(),
            order.status.to_string(),
            order.quote.subtotal.to_string(),
            order.quote.tax.to_string(),
            order.quote.delivery_fee.to_string(),
            order.quote.total.to_string(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::new(3..7), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{
        cart::CartCandidate,
        ids::{ItemId, RestaurantId},
    };

    use super::*;

    fn candidate(item: u64, restaurant: &str, price: i64) -> CartCandidate {
        CartCandidate {
            item_id: ItemId(item),
            restaurant_id: RestaurantId::from(restaurant),
            name: format!("Dish {item}"),
            unit_price: Money::from_minor(price, GBP),
            image: String::new(),
        }
    }

    #[test]
    fn empty_cart_says_so() -> TestResult {
        let mut out = Vec::new();

        write_cart(&mut out, &Cart::new(GBP))?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty\n");

        Ok(())
    }

    #[test]
    fn cart_table_lists_groups_and_split_actions() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add_item(candidate(1, "Pizza Palace", 10_00))?;
        cart.add_item(candidate(2, "Noodle Bar", 5_00))?;

        let mut out = Vec::new();
        write_cart(&mut out, &cart)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Dish 1"));
        assert!(rendered.contains("Dish 2"));
        assert!(rendered.contains("Checkout Pizza Palace"));
        assert!(rendered.contains("Checkout all restaurants"));

        Ok(())
    }

    #[test]
    fn single_restaurant_shows_combined_action() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add_item(candidate(1, "Pizza Palace", 10_00))?;

        let mut out = Vec::new();
        write_cart(&mut out, &cart)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Checkout (Pizza Palace)"));
        assert!(!rendered.contains("Checkout all restaurants"));

        Ok(())
    }
}
