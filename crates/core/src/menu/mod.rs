//! Menus
//!
//! Restaurant menus loaded from YAML. A menu is the source of [`CartCandidate`]s: names, prices
//! and images are copied from here when an item is added to the cart.

use std::{fs, path::Path};

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::CartCandidate,
    ids::{ItemId, LineKey, RestaurantId},
    parse::{ParseError, parse_price},
};

/// Menu loading and lookup errors
#[derive(Debug, Error)]
pub enum MenuError {
    /// IO error reading a menu file
    #[error("Failed to read menu file")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse menu YAML")]
    Yaml(#[from] serde_norway::Error),

    /// An item's price could not be read
    #[error("Invalid price for {key}")]
    Price {
        /// Offending item
        key: LineKey,

        /// Underlying parse failure
        #[source]
        source: ParseError,
    },

    /// An item is priced below zero
    #[error("Negative price for {0}")]
    NegativePrice(LineKey),

    /// Currency mismatch between items
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The menu lists no items, so its currency is unknown
    #[error("Menu has no items; currency unknown")]
    NoCurrency,

    /// A restaurant id appears twice
    #[error("Duplicate restaurant: {0}")]
    DuplicateRestaurant(RestaurantId),

    /// An item id appears twice within one restaurant
    #[error("Duplicate menu item: {0}")]
    DuplicateItem(LineKey),

    /// Lookup of an unknown item
    #[error("Menu item not found: {0}")]
    ItemNotFound(LineKey),

    /// The item is listed but not currently offered
    #[error("Menu item unavailable: {0}")]
    ItemUnavailable(LineKey),
}

/// Menu file layout
#[derive(Debug, Deserialize)]
struct MenuFixture {
    restaurants: Vec<RestaurantFixture>,
}

#[derive(Debug, Deserialize)]
struct RestaurantFixture {
    id: String,
    name: String,
    #[serde(default)]
    items: Vec<MenuItemFixture>,
}

#[derive(Debug, Deserialize)]
struct MenuItemFixture {
    id: u64,
    name: String,

    /// Price, e.g. "10.00 GBP"
    price: String,

    #[serde(default)]
    image: String,

    #[serde(default = "available_by_default")]
    available: bool,
}

fn available_by_default() -> bool {
    true
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Item id, unique within the restaurant
    pub id: ItemId,

    /// Dish name
    pub name: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Image reference
    pub image: String,

    /// Whether the dish can currently be ordered
    pub available: bool,
}

/// A restaurant and its dishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    /// Restaurant id
    pub id: RestaurantId,

    /// Display name
    pub name: String,

    /// Dishes in menu order
    pub items: Vec<MenuItem>,
}

/// Menus for every restaurant, priced in one currency.
#[derive(Debug)]
pub struct Menu {
    currency: &'static Currency,
    restaurants: Vec<Restaurant>,
    lookup: FxHashMap<LineKey, (usize, usize)>,
}

impl Menu {
    /// Load a menu from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`MenuError`] if the file cannot be read or is not a valid menu.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MenuError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a menu from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`MenuError`] if the YAML is malformed, a price is invalid or negative,
    /// currencies are mixed, ids are duplicated, or no item is listed.
    pub fn from_yaml(yaml: &str) -> Result<Self, MenuError> {
        let fixture: MenuFixture = serde_norway::from_str(yaml)?;

        let mut currency: Option<&'static Currency> = None;
        let mut restaurants = Vec::with_capacity(fixture.restaurants.len());
        let mut lookup = FxHashMap::default();
        let mut seen_restaurants = FxHashSet::default();

        for (restaurant_idx, restaurant) in fixture.restaurants.into_iter().enumerate() {
            let restaurant_id = RestaurantId::new(restaurant.id);

            if !seen_restaurants.insert(restaurant_id.clone()) {
                return Err(MenuError::DuplicateRestaurant(restaurant_id));
            }

            let mut items = Vec::with_capacity(restaurant.items.len());

            for (item_idx, item) in restaurant.items.into_iter().enumerate() {
                let key = LineKey::new(item.id, restaurant_id.clone());
                let (minor_units, item_currency) =
                    parse_price(&item.price).map_err(|source| MenuError::Price {
                        key: key.clone(),
                        source,
                    })?;

                if minor_units < 0 {
                    return Err(MenuError::NegativePrice(key));
                }

                match currency {
                    None => currency = Some(item_currency),
                    Some(expected) if expected != item_currency => {
                        return Err(MenuError::CurrencyMismatch(
                            expected.iso_alpha_code,
                            item_currency.iso_alpha_code,
                        ));
                    }
                    Some(_) => {}
                }

                if lookup.insert(key.clone(), (restaurant_idx, item_idx)).is_some() {
                    return Err(MenuError::DuplicateItem(key));
                }

                items.push(MenuItem {
                    id: ItemId(item.id),
                    name: item.name,
                    price: Money::from_minor(minor_units, item_currency),
                    image: item.image,
                    available: item.available,
                });
            }

            restaurants.push(Restaurant {
                id: restaurant_id,
                name: restaurant.name,
                items,
            });
        }

        Ok(Menu {
            currency: currency.ok_or(MenuError::NoCurrency)?,
            restaurants,
            lookup,
        })
    }

    /// Returns the currency every item is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Iterate over restaurants in file order.
    pub fn restaurants(&self) -> impl Iterator<Item = &Restaurant> {
        self.restaurants.iter()
    }

    /// Look up a restaurant.
    pub fn restaurant(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|restaurant| &restaurant.id == id)
    }

    /// Look up a dish.
    pub fn item(&self, key: &LineKey) -> Option<&MenuItem> {
        let &(restaurant_idx, item_idx) = self.lookup.get(key)?;

        self.restaurants
            .get(restaurant_idx)
            .and_then(|restaurant| restaurant.items.get(item_idx))
    }

    /// Build an add-to-cart candidate for a dish.
    ///
    /// # Errors
    ///
    /// - [`MenuError::ItemNotFound`]: the dish is not on the menu.
    /// - [`MenuError::ItemUnavailable`]: the dish is listed but not offered right now.
    pub fn candidate(&self, key: &LineKey) -> Result<CartCandidate, MenuError> {
        let item = self
            .item(key)
            .ok_or_else(|| MenuError::ItemNotFound(key.clone()))?;

        if !item.available {
            return Err(MenuError::ItemUnavailable(key.clone()));
        }

        Ok(CartCandidate {
            item_id: item.id,
            restaurant_id: key.restaurant.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            image: item.image.clone(),
        })
    }
}
