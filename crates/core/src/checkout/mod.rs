//! Checkout
//!
//! Decides which checkout actions a cart offers and turns a chosen scope into per-restaurant
//! order requests.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, RestaurantGroup, grand_total},
    ids::RestaurantId,
};

pub mod requests;
pub mod submit;

pub use requests::{AddressError, DeliveryAddress, OrderLine, OrderRequest};
pub use submit::{
    CheckoutReport, MockOrderSubmitter, OrderSubmitter, PlacedOrder, RestaurantOutcome,
    SubmitError, submit_checkout,
};

/// Errors raised while selecting or submitting a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was requested on an empty cart.
    #[error("cart is empty; nothing to check out")]
    EmptyCart,

    /// The requested restaurant has no lines in the cart.
    #[error("restaurant {0} has no items in the cart")]
    UnknownRestaurant(RestaurantId),

    /// The delivery address is incomplete.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Cart totals could not be calculated.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// What part of the cart to check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutScope {
    /// Every restaurant in the cart.
    All,

    /// A single restaurant's lines.
    Restaurant(RestaurantId),
}

impl fmt::Display for CheckoutScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutScope::All => f.write_str("all"),
            CheckoutScope::Restaurant(restaurant) => write!(f, "restaurant:{restaurant}"),
        }
    }
}

/// The checkout actions a cart currently offers.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOffer {
    /// The cart is empty.
    Unavailable,

    /// One restaurant: checking it out and checking out everything are the same action.
    Combined {
        /// The only restaurant in the cart
        restaurant: RestaurantId,

        /// Its subtotal
        total: Money<'static, Currency>,
    },

    /// Several restaurants: each can be checked out alone, or all together.
    Split {
        /// Each restaurant with its subtotal, in cart order
        restaurants: Vec<(RestaurantId, Money<'static, Currency>)>,

        /// Grand total for "checkout all"
        total: Money<'static, Currency>,
    },
}

impl CheckoutOffer {
    /// Whether any checkout action is offered.
    pub fn is_available(&self) -> bool {
        !matches!(self, CheckoutOffer::Unavailable)
    }

    /// The scopes a user may pick from.
    pub fn scopes(&self) -> Vec<CheckoutScope> {
        match self {
            CheckoutOffer::Unavailable => Vec::new(),
            CheckoutOffer::Combined { .. } => vec![CheckoutScope::All],
            CheckoutOffer::Split { restaurants, .. } => restaurants
                .iter()
                .map(|(restaurant, _)| CheckoutScope::Restaurant(restaurant.clone()))
                .chain([CheckoutScope::All])
                .collect(),
        }
    }
}

/// The groups chosen for one checkout, with their combined total.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSelection<'c> {
    groups: Vec<RestaurantGroup<'c>>,
    total: Money<'static, Currency>,
}

impl<'c> CheckoutSelection<'c> {
    /// Returns the selected restaurant groups.
    pub fn groups(&self) -> &[RestaurantGroup<'c>] {
        &self.groups
    }

    /// Returns the combined total of the selected groups.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Build one order request per selected restaurant.
    pub fn order_requests(&self, address: &DeliveryAddress) -> Vec<OrderRequest> {
        self.groups
            .iter()
            .map(|group| OrderRequest::from_group(group, address.clone()))
            .collect()
    }
}

impl Cart {
    /// Work out which checkout actions to offer for the cart's current contents.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError::Cart`] if totals cannot be calculated.
    pub fn checkout_offer(&self) -> Result<CheckoutOffer, CheckoutError> {
        let groups = self.groups()?;

        let offer = match groups.as_slice() {
            [] => CheckoutOffer::Unavailable,
            [only] => CheckoutOffer::Combined {
                restaurant: only.restaurant().clone(),
                total: only.subtotal(),
            },
            many => CheckoutOffer::Split {
                restaurants: many
                    .iter()
                    .map(|group| (group.restaurant().clone(), group.subtotal()))
                    .collect(),
                total: grand_total(self.currency(), many)?,
            },
        };

        Ok(offer)
    }

    /// Select the groups covered by a checkout scope.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::UnknownRestaurant`]: the scoped restaurant has no lines.
    /// - [`CheckoutError::Cart`]: totals could not be calculated.
    pub fn select(&self, scope: &CheckoutScope) -> Result<CheckoutSelection<'_>, CheckoutError> {
        if self.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let groups: Vec<RestaurantGroup<'_>> = match scope {
            CheckoutScope::All => self.groups()?,
            CheckoutScope::Restaurant(restaurant) => {
                let group = self
                    .groups()?
                    .into_iter()
                    .find(|group| group.restaurant() == restaurant)
                    .ok_or_else(|| CheckoutError::UnknownRestaurant(restaurant.clone()))?;

                vec![group]
            }
        };

        let total = grand_total(self.currency(), &groups)?;

        Ok(CheckoutSelection { groups, total })
    }
}
