//! Cart
//!
//! The session cart: an insertion-ordered set of [`CartLine`]s keyed by `(item, restaurant)`.
//! Every mutation goes through [`Cart::add_item`], [`Cart::remove_item`],
//! [`Cart::update_quantity`] or [`Cart::clear`].

use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::debug;

use crate::ids::{ItemId, LineKey, RestaurantId};

pub mod groups;

pub use groups::{RestaurantGroup, grand_total};

new_key_type! {
    /// Cart line slot
    pub struct CartLineKey;
}

/// Errors related to cart contents or totals.
#[derive(Debug, Error)]
pub enum CartError {
    /// A candidate's currency differs from the cart currency (line, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(LineKey, &'static str, &'static str),

    /// A line total does not fit in minor units.
    #[error("Line total for {0} overflowed")]
    Overflow(LineKey),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A menu item offered for adding to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartCandidate {
    /// Menu item
    pub item_id: ItemId,

    /// Owning restaurant
    pub restaurant_id: RestaurantId,

    /// Display name
    pub name: String,

    /// Price of a single unit
    pub unit_price: Money<'static, Currency>,

    /// Image reference
    pub image: String,
}

impl CartCandidate {
    /// Line key this candidate would occupy.
    pub fn key(&self) -> LineKey {
        LineKey {
            item: self.item_id,
            restaurant: self.restaurant_id.clone(),
        }
    }
}

/// One distinct `(item, restaurant)` entry in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    key: LineKey,
    name: String,
    unit_price: Money<'static, Currency>,
    image: String,
    quantity: u32,
}

impl CartLine {
    fn from_candidate(candidate: CartCandidate) -> Self {
        Self {
            key: LineKey {
                item: candidate.item_id,
                restaurant: candidate.restaurant_id,
            },
            name: candidate.name,
            unit_price: candidate.unit_price,
            image: candidate.image,
            quantity: 1,
        }
    }

    /// Returns the composite key of the line.
    pub fn key(&self) -> &LineKey {
        &self.key
    }

    /// Returns the menu item.
    pub fn item_id(&self) -> ItemId {
        self.key.item
    }

    /// Returns the owning restaurant.
    pub fn restaurant_id(&self) -> &RestaurantId {
        &self.key.restaurant
    }

    /// Returns the display name captured when the line was added.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price captured when the line was added.
    pub fn unit_price(&self) -> &Money<'static, Currency> {
        &self.unit_price
    }

    /// Returns the image reference.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Returns the quantity, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, CartError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| CartError::Overflow(self.key.clone()))?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line with that key exists.
    Missing,

    /// The line now has this quantity.
    Updated(u32),

    /// The quantity dropped to zero and the line was removed.
    Removed,
}

/// Cart
#[derive(Debug)]
pub struct Cart {
    currency: &'static Currency,
    lines: SlotMap<CartLineKey, CartLine>,
    index: FxHashMap<LineKey, CartLineKey>,
    order: Vec<CartLineKey>,
}

impl Cart {
    /// Create a new, empty cart priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            currency,
            lines: SlotMap::with_key(),
            index: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Add one unit of a candidate to the cart, returning the line's new quantity.
    ///
    /// An existing line for the same `(item, restaurant)` has its quantity incremented and keeps
    /// its original name, price and image. Otherwise a new line with quantity one is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the candidate is priced in another currency.
    pub fn add_item(&mut self, candidate: CartCandidate) -> Result<u32, CartError> {
        let key = candidate.key();

        let item_currency = candidate.unit_price.currency();
        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                key,
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        match self
            .index
            .get(&key)
            .and_then(|&slot| self.lines.get_mut(slot))
        {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                debug!(line = %key, quantity = line.quantity, "incremented cart line");

                Ok(line.quantity)
            }
            None => {
                let slot = self.lines.insert(CartLine::from_candidate(candidate));
                self.order.push(slot);
                debug!(line = %key, "added cart line");
                self.index.insert(key, slot);

                Ok(1)
            }
        }
    }

    /// Remove a line entirely. Removing a missing line is a no-op and returns `None`.
    pub fn remove_item(&mut self, key: &LineKey) -> Option<CartLine> {
        let slot = self.index.remove(key)?;

        self.order.retain(|&existing| existing != slot);
        debug!(line = %key, "removed cart line");

        self.lines.remove(slot)
    }

    /// Adjust a line's quantity by `delta`, clamping at zero.
    ///
    /// A line whose quantity reaches zero is removed. Missing lines are left alone.
    pub fn update_quantity(&mut self, key: &LineKey, delta: i64) -> QuantityChange {
        let Some(line) = self
            .index
            .get(key)
            .and_then(|&slot| self.lines.get_mut(slot))
        else {
            return QuantityChange::Missing;
        };

        let adjusted = i64::from(line.quantity).saturating_add(delta).max(0);

        if adjusted == 0 {
            self.remove_item(key);

            return QuantityChange::Removed;
        }

        line.quantity = u32::try_from(adjusted).unwrap_or(u32::MAX);
        debug!(line = %key, delta, quantity = line.quantity, "adjusted cart line");

        QuantityChange::Updated(line.quantity)
    }

    /// Remove every line belonging to a restaurant, returning how many were removed.
    pub fn remove_restaurant(&mut self, restaurant: &RestaurantId) -> usize {
        let keys: Vec<LineKey> = self
            .iter()
            .filter(|line| line.restaurant_id() == restaurant)
            .map(|line| line.key().clone())
            .collect();

        keys.iter()
            .filter_map(|key| self.remove_item(key))
            .count()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.index.clear();
        self.order.clear();
        debug!("cleared cart");
    }

    /// Get a line by key.
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.index.get(key).and_then(|&slot| self.lines.get(slot))
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.order.iter().filter_map(|&slot| self.lines.get(slot))
    }

    /// Get the number of distinct lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    fn candidate(item: u64, restaurant: &str, price: i64) -> CartCandidate {
        CartCandidate {
            item_id: ItemId(item),
            restaurant_id: RestaurantId::from(restaurant),
            name: format!("Item {item}"),
            unit_price: Money::from_minor(price, GBP),
            image: format!("item-{item}.jpg"),
        }
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new(GBP);

        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
        assert_eq!(cart.currency(), GBP);
    }

    #[test]
    fn adding_new_item_starts_at_quantity_one() -> TestResult {
        let mut cart = Cart::new(GBP);

        assert_eq!(cart.add_item(candidate(1, "A", 10_00))?, 1);

        let line = cart.get(&LineKey::new(1, "A")).ok_or("line missing")?;

        assert_eq!(line.quantity(), 1);
        assert_eq!(line.name(), "Item 1");
        assert_eq!(line.image(), "item-1.jpg");
        assert_eq!(line.unit_price(), &Money::from_minor(10_00, GBP));

        Ok(())
    }

    #[test]
    fn repeated_adds_merge_into_one_line() -> TestResult {
        let mut cart = Cart::new(GBP);

        for _ in 0..5 {
            cart.add_item(candidate(1, "A", 10_00))?;
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.get(&LineKey::new(1, "A")).map(CartLine::quantity),
            Some(5)
        );

        Ok(())
    }

    #[test]
    fn repeated_add_keeps_original_price_and_name() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 10_00))?;

        let mut repriced = candidate(1, "A", 12_50);
        repriced.name = "Renamed".to_string();

        assert_eq!(cart.add_item(repriced)?, 2);

        let line = cart.get(&LineKey::new(1, "A")).ok_or("line missing")?;

        assert_eq!(line.quantity(), 2);
        assert_eq!(line.name(), "Item 1");
        assert_eq!(line.unit_price(), &Money::from_minor(10_00, GBP));

        Ok(())
    }

    #[test]
    fn same_item_from_two_restaurants_is_two_lines() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 10_00))?;
        cart.add_item(candidate(1, "B", 10_00))?;

        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn add_rejects_currency_mismatch() -> TestResult {
        let mut cart = Cart::new(GBP);
        let mut dollars = candidate(1, "A", 10_00);
        dollars.unit_price = Money::from_minor(10_00, USD);

        let result = cart.add_item(dollars);

        match result {
            Err(CartError::CurrencyMismatch(key, item_currency, cart_currency)) => {
                assert_eq!(key, LineKey::new(1, "A"));
                assert_eq!(item_currency, USD.iso_alpha_code);
                assert_eq!(cart_currency, GBP.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn remove_item_deletes_line() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 10_00))?;
        cart.add_item(candidate(2, "A", 5_00))?;

        let removed = cart.remove_item(&LineKey::new(1, "A"));

        assert_eq!(removed.map(|line| line.item_id()), Some(ItemId(1)));
        assert_eq!(cart.len(), 1);
        assert!(cart.get(&LineKey::new(1, "A")).is_none());

        Ok(())
    }

    #[test]
    fn remove_missing_item_is_noop() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 10_00))?;

        let before: Vec<CartLine> = cart.iter().cloned().collect();
        let removed = cart.remove_item(&LineKey::new(1, "B"));
        let after: Vec<CartLine> = cart.iter().cloned().collect();

        assert!(removed.is_none());
        assert_eq!(before, after);

        Ok(())
    }

    #[test]
    fn update_quantity_applies_delta() -> TestResult {
        let mut cart = Cart::new(GBP);
        let key = LineKey::new(1, "A");

        cart.add_item(candidate(1, "A", 10_00))?;

        assert_eq!(cart.update_quantity(&key, 1), QuantityChange::Updated(2));
        assert_eq!(cart.update_quantity(&key, 3), QuantityChange::Updated(5));
        assert_eq!(cart.update_quantity(&key, -4), QuantityChange::Updated(1));

        Ok(())
    }

    #[test]
    fn update_quantity_to_zero_removes_line() -> TestResult {
        let mut cart = Cart::new(GBP);
        let key = LineKey::new(1, "A");

        cart.add_item(candidate(1, "A", 10_00))?;

        assert_eq!(cart.update_quantity(&key, -1), QuantityChange::Removed);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn update_quantity_below_zero_removes_line() -> TestResult {
        let mut cart = Cart::new(GBP);
        let key = LineKey::new(1, "A");

        cart.add_item(candidate(1, "A", 10_00))?;
        cart.add_item(candidate(1, "A", 10_00))?;

        assert_eq!(cart.update_quantity(&key, -10), QuantityChange::Removed);
        assert!(cart.get(&key).is_none());
        assert!(cart.iter().all(|line| line.quantity() >= 1));

        Ok(())
    }

    #[test]
    fn update_quantity_missing_line_is_noop() {
        let mut cart = Cart::new(GBP);

        assert_eq!(
            cart.update_quantity(&LineKey::new(9, "Z"), 1),
            QuantityChange::Missing
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn iter_preserves_insertion_order_after_removal() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 1_00))?;
        cart.add_item(candidate(2, "B", 2_00))?;
        cart.add_item(candidate(3, "A", 3_00))?;
        cart.remove_item(&LineKey::new(2, "B"));
        cart.add_item(candidate(4, "C", 4_00))?;

        let items: Vec<u64> = cart.iter().map(|line| line.item_id().0).collect();

        assert_eq!(items, vec![1, 3, 4]);

        Ok(())
    }

    #[test]
    fn remove_restaurant_only_touches_that_restaurant() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 1_00))?;
        cart.add_item(candidate(2, "B", 2_00))?;
        cart.add_item(candidate(3, "A", 3_00))?;

        let removed = cart.remove_restaurant(&RestaurantId::from("A"));

        assert_eq!(removed, 2);
        assert_eq!(cart.len(), 1);
        assert!(cart.get(&LineKey::new(2, "B")).is_some());

        Ok(())
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 1_00))?;
        cart.add_item(candidate(2, "B", 2_00))?;
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.unit_count(), 0);
        assert!(cart.get(&LineKey::new(1, "A")).is_none());

        Ok(())
    }

    #[test]
    fn unit_count_sums_quantities() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 1_00))?;
        cart.add_item(candidate(1, "A", 1_00))?;
        cart.add_item(candidate(2, "B", 2_00))?;

        assert_eq!(cart.unit_count(), 3);

        Ok(())
    }

    #[test]
    fn line_total_multiplies_quantity() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_item(candidate(1, "A", 2_50))?;
        cart.add_item(candidate(1, "A", 2_50))?;

        let line = cart.get(&LineKey::new(1, "A")).ok_or("line missing")?;

        assert_eq!(line.line_total()?, Money::from_minor(5_00, GBP));

        Ok(())
    }

    #[test]
    fn line_total_overflow_returns_error() -> TestResult {
        let mut cart = Cart::new(GBP);
        let key = LineKey::new(1, "A");

        cart.add_item(candidate(1, "A", i64::MAX / 2))?;
        cart.update_quantity(&key, 2);

        let result = cart.get(&key).map(CartLine::line_total);

        assert!(matches!(result, Some(Err(CartError::Overflow(_)))));

        Ok(())
    }
}
