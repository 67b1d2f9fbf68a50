//! Restaurant groups
//!
//! Derived, per-restaurant view of a cart used for display and checkout splitting.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    cart::{Cart, CartError, CartLine},
    ids::RestaurantId,
};

/// The lines of one restaurant together with their subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantGroup<'c> {
    restaurant: &'c RestaurantId,
    lines: SmallVec<[&'c CartLine; 4]>,
    subtotal: Money<'static, Currency>,
}

impl<'c> RestaurantGroup<'c> {
    /// Returns the restaurant this group belongs to.
    pub fn restaurant(&self) -> &'c RestaurantId {
        self.restaurant
    }

    /// Returns the lines of the group in cart order.
    pub fn lines(&self) -> &[&'c CartLine] {
        &self.lines
    }

    /// Sum of unit price × quantity over the group's lines.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Total number of units in the group.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }
}

impl Cart {
    /// Group the cart's lines by restaurant.
    ///
    /// Groups appear in the order their restaurant was first seen in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line total or subtotal cannot be represented.
    pub fn groups(&self) -> Result<Vec<RestaurantGroup<'_>>, CartError> {
        let mut positions: FxHashMap<&RestaurantId, usize> = FxHashMap::default();
        let mut grouped: Vec<(&RestaurantId, SmallVec<[&CartLine; 4]>)> = Vec::new();

        for line in self.iter() {
            let restaurant = line.restaurant_id();

            if let Some(lines) = positions
                .get(restaurant)
                .and_then(|&position| grouped.get_mut(position))
                .map(|(_, lines)| lines)
            {
                lines.push(line);
            } else {
                positions.insert(restaurant, grouped.len());
                grouped.push((restaurant, SmallVec::from_elem(line, 1)));
            }
        }

        grouped
            .into_iter()
            .map(|(restaurant, lines)| -> Result<_, CartError> {
                let subtotal = lines.iter().try_fold(
                    Money::from_minor(0, self.currency),
                    |acc, line| -> Result<_, CartError> { Ok(acc.add(line.line_total()?)?) },
                )?;

                Ok(RestaurantGroup {
                    restaurant,
                    lines,
                    subtotal,
                })
            })
            .collect()
    }

    /// Sum of every line in the cart. Zero for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line total or the sum cannot be represented.
    pub fn grand_total(&self) -> Result<Money<'static, Currency>, CartError> {
        grand_total(self.currency, &self.groups()?)
    }
}

/// Sum of the subtotals of the given groups. No taxes or fees are applied.
///
/// # Errors
///
/// Returns [`CartError::Money`] if the money arithmetic fails.
pub fn grand_total(
    currency: &'static Currency,
    groups: &[RestaurantGroup<'_>],
) -> Result<Money<'static, Currency>, CartError> {
    let total = groups
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, group| {
            acc.add(group.subtotal)
        })?;

    Ok(total)
}
