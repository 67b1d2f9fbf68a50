//! Order submission
//!
//! Checkout hands one [`OrderRequest`] per restaurant to an [`OrderSubmitter`]. Submissions are
//! independent: a failure for one restaurant does not undo or block the others, and only the
//! restaurants whose order was accepted are removed from the cart.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    cart::Cart,
    checkout::{CheckoutError, CheckoutScope, DeliveryAddress, OrderRequest},
    ids::RestaurantId,
    orders::pricing::OrderQuote,
};

/// Errors reported by the order service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The order service refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The order service could not be reached.
    #[error("order service unavailable: {0}")]
    Unavailable(String),
}

/// An order accepted by the order service.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    /// Order identifier assigned by the service
    pub uuid: Uuid,

    /// Final pricing, including tax and delivery
    pub quote: OrderQuote,
}

/// Seam to whatever accepts finalized orders.
#[automock]
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit a single-restaurant order.
    async fn submit_order(&self, request: OrderRequest) -> Result<PlacedOrder, SubmitError>;
}

/// What happened to one restaurant's order.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantOutcome {
    /// Restaurant the order was for
    pub restaurant: RestaurantId,

    /// The placed order, or why it failed
    pub result: Result<PlacedOrder, SubmitError>,
}

/// Per-restaurant results of one checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutReport {
    outcomes: Vec<RestaurantOutcome>,
}

impl CheckoutReport {
    /// All outcomes in submission order.
    pub fn outcomes(&self) -> &[RestaurantOutcome] {
        &self.outcomes
    }

    /// Orders that were accepted.
    pub fn placed(&self) -> impl Iterator<Item = (&RestaurantId, &PlacedOrder)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .ok()
                .map(|placed| (&outcome.restaurant, placed))
        })
    }

    /// Orders that failed.
    pub fn failed(&self) -> impl Iterator<Item = (&RestaurantId, &SubmitError)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|error| (&outcome.restaurant, error))
        })
    }

    /// True when every submitted order was accepted.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }
}

/// Submit the selected part of the cart, one order per restaurant.
///
/// Lines of restaurants whose order was accepted are removed from the cart; lines of
/// restaurants whose submission failed stay so the user can retry.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if nothing can be submitted: the cart or scope is empty, the
/// address is incomplete, or totals cannot be calculated. Individual submission failures are
/// reported in the [`CheckoutReport`] instead.
#[instrument(skip_all, fields(scope = %scope))]
pub async fn submit_checkout<S>(
    submitter: &S,
    cart: &mut Cart,
    scope: &CheckoutScope,
    address: &DeliveryAddress,
) -> Result<CheckoutReport, CheckoutError>
where
    S: OrderSubmitter + ?Sized,
{
    address.validate()?;

    let requests = cart.select(scope)?.order_requests(address);
    let mut report = CheckoutReport::default();

    for request in requests {
        let restaurant = request.restaurant_id.clone();
        let result = submitter.submit_order(request).await;

        match &result {
            Ok(placed) => {
                let removed = cart.remove_restaurant(&restaurant);
                info!(
                    %restaurant,
                    order = %placed.uuid,
                    total = %placed.quote.total,
                    removed,
                    "order placed"
                );
            }
            Err(error) => {
                warn!(%restaurant, %error, "order submission failed");
            }
        }

        report.outcomes.push(RestaurantOutcome { restaurant, result });
    }

    Ok(report)
}
