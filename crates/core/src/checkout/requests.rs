//! Order requests handed to the order service.

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::RestaurantGroup,
    ids::{ItemId, RestaurantId},
};

/// A required address field was blank.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The named field is missing or blank.
    #[error("delivery address is missing {0}")]
    MissingField(&'static str),
}

/// Where an order is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Street and number
    pub street: String,

    /// City
    pub city: String,

    /// State or county
    pub state: String,

    /// Postal code
    pub zip_code: String,
}

impl DeliveryAddress {
    /// Check that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| Err(AddressError::MissingField(field)))
    }
}

/// One line of an order request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Menu item
    pub item_id: ItemId,

    /// Restaurant the item is ordered from
    pub restaurant_id: RestaurantId,

    /// Number of units
    pub quantity: u32,

    /// Price per unit as shown in the cart
    pub unit_price: Money<'static, Currency>,
}

/// A single-restaurant order ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Restaurant fulfilling the order
    pub restaurant_id: RestaurantId,

    /// Ordered lines
    pub items: Vec<OrderLine>,

    /// Delivery address
    pub delivery_address: DeliveryAddress,
}

impl OrderRequest {
    /// Build a request from a restaurant group.
    pub fn from_group(group: &RestaurantGroup<'_>, delivery_address: DeliveryAddress) -> Self {
        let items = group
            .lines()
            .iter()
            .map(|line| OrderLine {
                item_id: line.item_id(),
                restaurant_id: line.restaurant_id().clone(),
                quantity: line.quantity(),
                unit_price: *line.unit_price(),
            })
            .collect();

        Self {
            restaurant_id: group.restaurant().clone(),
            items,
            delivery_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            street: "1 High Street".to_string(),
            city: "London".to_string(),
            state: "Greater London".to_string(),
            zip_code: "N1 1AA".to_string(),
        }
    }

    #[test]
    fn complete_address_is_valid() {
        assert_eq!(address().validate(), Ok(()));
    }

    #[test]
    fn blank_field_is_reported() {
        let mut incomplete = address();
        incomplete.city = "   ".to_string();

        assert_eq!(
            incomplete.validate(),
            Err(AddressError::MissingField("city"))
        );
    }

    #[test]
    fn first_blank_field_wins() {
        let mut incomplete = address();
        incomplete.street = String::new();
        incomplete.zip_code = String::new();

        assert_eq!(
            incomplete.validate(),
            Err(AddressError::MissingField("street"))
        );
    }
}
