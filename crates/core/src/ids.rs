//! Identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Menu item identifier.
///
/// Only unique in combination with a [`RestaurantId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        ItemId(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Restaurant identifier (or display name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Creates a restaurant identifier.
    pub fn new(id: impl Into<String>) -> Self {
        RestaurantId(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RestaurantId {
    fn from(value: &str) -> Self {
        RestaurantId::new(value)
    }
}

impl From<String> for RestaurantId {
    fn from(value: String) -> Self {
        RestaurantId(value)
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite cart key: one line per `(item, restaurant)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Menu item
    pub item: ItemId,

    /// Owning restaurant
    pub restaurant: RestaurantId,
}

impl LineKey {
    /// Creates a new line key.
    pub fn new(item: u64, restaurant: impl Into<RestaurantId>) -> Self {
        Self {
            item: ItemId(item),
            restaurant: restaurant.into(),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.item, self.restaurant)
    }
}
