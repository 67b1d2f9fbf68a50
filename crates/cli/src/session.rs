//! Scripted cart sessions
//!
//! A session file lists the taps a user would make: adding and removing dishes, adjusting
//! quantities and checking out.

use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use dishcart::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Session file errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// IO error reading the session file
    #[error("Failed to read session file")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse session YAML")]
    Yaml(#[from] serde_norway::Error),
}

/// One user action, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Add one unit of a dish
    Add {
        /// Menu item id
        item: u64,

        /// Restaurant id
        restaurant: String,
    },

    /// Remove a line
    Remove {
        /// Menu item id
        item: u64,

        /// Restaurant id
        restaurant: String,
    },

    /// Change a line's quantity by `delta`
    Adjust {
        /// Menu item id
        item: u64,

        /// Restaurant id
        restaurant: String,

        /// Quantity change
        delta: i64,
    },

    /// Empty the cart
    Clear,

    /// Print the cart
    Show,

    /// Check out one restaurant
    Checkout {
        /// Restaurant id
        restaurant: String,
    },

    /// Check out every restaurant
    CheckoutAll,

    /// Print the order history
    Orders,
}

/// A scripted session.
#[derive(Debug, Deserialize)]
pub struct Session {
    /// Address used for every checkout
    pub delivery_address: DeliveryAddress,

    /// Actions in order
    pub steps: Vec<Step>,
}

impl Session {
    /// Load a session from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let contents = fs::read_to_string(path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

/// Play a session against an order book and its menu, writing tables to `out`.
///
/// # Errors
///
/// Returns an error if a step adds a dish that is not on the menu or not available, or if
/// totals or output fail. Checkouts that are not on offer are logged and skipped.
pub async fn run(
    session: &Session,
    book: &LocalOrderBook,
    out: &mut impl io::Write,
) -> Result<Cart> {
    let menu = book.menu();
    let mut cart = Cart::new(menu.currency());

    for step in &session.steps {
        match step {
            Step::Add { item, restaurant } => {
                let key = LineKey::new(*item, restaurant.as_str());
                let candidate = menu
                    .candidate(&key)
                    .with_context(|| format!("adding {key}"))?;
                let quantity = cart.add_item(candidate)?;

                info!(line = %key, quantity, "add");
            }
            Step::Remove { item, restaurant } => {
                let key = LineKey::new(*item, restaurant.as_str());

                if cart.remove_item(&key).is_none() {
                    warn!(line = %key, "remove: not in cart");
                }
            }
            Step::Adjust {
                item,
                restaurant,
                delta,
            } => {
                let key = LineKey::new(*item, restaurant.as_str());
                let change = cart.update_quantity(&key, *delta);

                info!(line = %key, delta, ?change, "adjust");
            }
            Step::Clear => cart.clear(),
            Step::Show => write_cart(out, &cart)?,
            Step::Checkout { restaurant } => {
                let scope = CheckoutScope::Restaurant(RestaurantId::from(restaurant.as_str()));

                checkout(book, &mut cart, &scope, &session.delivery_address, out).await?;
            }
            Step::CheckoutAll => {
                checkout(book, &mut cart, &CheckoutScope::All, &session.delivery_address, out)
                    .await?;
            }
            Step::Orders => write_orders(out, &book.orders().await)?,
        }
    }

    Ok(cart)
}

async fn checkout(
    book: &LocalOrderBook,
    cart: &mut Cart,
    scope: &CheckoutScope,
    address: &DeliveryAddress,
    out: &mut impl io::Write,
) -> Result<()> {
    match submit_checkout(book, cart, scope, address).await {
        Ok(report) => {
            write_checkout_report(out, &report)?;
        }
        Err(error @ (CheckoutError::EmptyCart | CheckoutError::UnknownRestaurant(_))) => {
            warn!(%scope, %error, "checkout not offered");
        }
        Err(error) => {
            return Err(error).with_context(|| format!("checkout {scope} failed"));
        }
    }

    Ok(())
}
