//! Order Models

use jiff::Timestamp;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    checkout::{DeliveryAddress, OrderLine, OrderRequest},
    ids::RestaurantId,
    orders::{OrderQuote, OrderStatus, PaymentStatus, StatusChange},
};

/// Errors raised by order lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// No order with that identifier.
    #[error("order {0} not found")]
    NotFound(Uuid),

    /// The status name is not recognised.
    #[error("invalid order status: {0}")]
    InvalidStatus(String),

    /// The order has been delivered or already cancelled.
    #[error("order {0} is {1} and cannot be cancelled")]
    NotCancellable(Uuid, OrderStatus),
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Order identifier (UUID v7, so orders sort by creation)
    pub uuid: Uuid,

    /// Restaurant preparing the order
    pub restaurant_id: RestaurantId,

    /// Ordered lines, at the prices charged
    pub items: Vec<OrderLine>,

    /// Where the order is delivered
    pub delivery_address: DeliveryAddress,

    /// Subtotal, tax, delivery fee and total
    pub quote: OrderQuote,

    /// Current fulfilment status
    pub status: OrderStatus,

    /// Payment state
    pub payment_status: PaymentStatus,

    /// Every status the order has been in, oldest first
    pub status_history: Vec<StatusChange>,

    /// When the order was placed
    pub created_at: Timestamp,

    /// Last status change
    pub updated_at: Timestamp,
}

impl Order {
    /// Create a pending order from a priced request.
    pub fn place(request: OrderRequest, quote: OrderQuote, at: Timestamp) -> Self {
        Self {
            uuid: Uuid::now_v7(),
            restaurant_id: request.restaurant_id,
            items: request.items,
            delivery_address: request.delivery_address,
            quote,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            status_history: vec![StatusChange {
                status: OrderStatus::Pending,
                at,
                note: None,
            }],
            created_at: at,
            updated_at: at,
        }
    }

    /// Move the order to a new status, recording it in the history.
    pub fn update_status(&mut self, status: OrderStatus, note: Option<String>, at: Timestamp) {
        self.status = status;
        self.status_history.push(StatusChange { status, at, note });
        self.updated_at = at;
    }

    /// Cancel on behalf of the customer.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotCancellable`] if the order was delivered or already cancelled.
    pub fn cancel(&mut self, at: Timestamp) -> Result<(), OrderError> {
        if !self.status.is_cancellable() {
            return Err(OrderError::NotCancellable(self.uuid, self.status));
        }

        self.update_status(
            OrderStatus::Cancelled,
            Some("Cancelled by customer".to_string()),
            at,
        );

        Ok(())
    }
}
