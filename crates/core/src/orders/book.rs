//! In-process order book
//!
//! Accepts orders through [`OrderSubmitter`] without a remote order service. Requests are checked
//! against the menu and every line is charged at the menu's price, whatever the request carried.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    checkout::{OrderLine, OrderRequest, OrderSubmitter, PlacedOrder, SubmitError},
    ids::{LineKey, RestaurantId},
    menu::Menu,
    orders::{Order, OrderError, OrderPricing, OrderStatus},
};

/// Orders kept in memory, checked against a [`Menu`] and priced with an [`OrderPricing`] policy.
#[derive(Debug)]
pub struct LocalOrderBook {
    menu: Arc<Menu>,
    pricing: OrderPricing,
    orders: Mutex<Vec<Order>>,
}

impl LocalOrderBook {
    /// Create an empty order book for a menu.
    #[must_use]
    pub fn new(menu: Arc<Menu>, pricing: OrderPricing) -> Self {
        Self {
            menu,
            pricing,
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Create an empty order book with the standard 10% tax and 5.00 delivery fee in the menu's
    /// currency.
    #[must_use]
    pub fn with_standard_pricing(menu: Arc<Menu>) -> Self {
        let pricing = OrderPricing::standard(menu.currency());

        Self::new(menu, pricing)
    }

    /// Returns the menu orders are checked against.
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Returns the pricing policy.
    pub fn pricing(&self) -> &OrderPricing {
        &self.pricing
    }

    /// All orders, newest first.
    pub async fn orders(&self) -> Vec<Order> {
        let orders = self.orders.lock().await;

        orders.iter().rev().cloned().collect()
    }

    /// Look up an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if there is no such order.
    pub async fn get(&self, uuid: Uuid) -> Result<Order, OrderError> {
        let orders = self.orders.lock().await;

        orders
            .iter()
            .find(|order| order.uuid == uuid)
            .cloned()
            .ok_or(OrderError::NotFound(uuid))
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] if there is no such order.
    pub async fn update_status(
        &self,
        uuid: Uuid,
        status: OrderStatus,
        note: Option<String>,
    ) -> Result<Order, OrderError> {
        let mut orders = self.orders.lock().await;

        let order = orders
            .iter_mut()
            .find(|order| order.uuid == uuid)
            .ok_or(OrderError::NotFound(uuid))?;

        order.update_status(status, note, Timestamp::now());
        debug!(order = %uuid, %status, "order status updated");

        Ok(order.clone())
    }

    /// Cancel an order on behalf of the customer.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`]: there is no such order.
    /// - [`OrderError::NotCancellable`]: the order was delivered or already cancelled.
    pub async fn cancel(&self, uuid: Uuid) -> Result<Order, OrderError> {
        let mut orders = self.orders.lock().await;

        let order = orders
            .iter_mut()
            .find(|order| order.uuid == uuid)
            .ok_or(OrderError::NotFound(uuid))?;

        order.cancel(Timestamp::now())?;
        info!(order = %uuid, "order cancelled");

        Ok(order.clone())
    }

    /// Check a request and return it with every line at its menu price.
    fn reprice(&self, request: OrderRequest) -> Result<OrderRequest, SubmitError> {
        if request.items.is_empty() {
            return Err(SubmitError::Rejected("order has no items".to_string()));
        }

        request
            .delivery_address
            .validate()
            .map_err(|error| SubmitError::Rejected(error.to_string()))?;

        if self.menu.restaurant(&request.restaurant_id).is_none() {
            return Err(SubmitError::Rejected(format!(
                "restaurant {} not found",
                request.restaurant_id
            )));
        }

        let items = request
            .items
            .into_iter()
            .map(|line| self.reprice_line(&request.restaurant_id, line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderRequest { items, ..request })
    }

    fn reprice_line(
        &self,
        restaurant: &RestaurantId,
        line: OrderLine,
    ) -> Result<OrderLine, SubmitError> {
        if &line.restaurant_id != restaurant {
            return Err(SubmitError::Rejected(format!(
                "item {} belongs to {}, not {}",
                line.item_id, line.restaurant_id, restaurant
            )));
        }

        if line.quantity == 0 {
            return Err(SubmitError::Rejected(format!(
                "item {} has zero quantity",
                line.item_id
            )));
        }

        let key = LineKey {
            item: line.item_id,
            restaurant: line.restaurant_id.clone(),
        };
        let item = self
            .menu
            .item(&key)
            .ok_or_else(|| SubmitError::Rejected(format!("menu item {key} not found")))?;

        if !item.available {
            return Err(SubmitError::Rejected(format!(
                "menu item {key} is unavailable"
            )));
        }

        if line.unit_price != item.price {
            debug!(
                line = %key,
                requested = %line.unit_price,
                menu = %item.price,
                "charging menu price"
            );
        }

        Ok(OrderLine {
            unit_price: item.price,
            ..line
        })
    }
}

#[async_trait]
impl OrderSubmitter for LocalOrderBook {
    async fn submit_order(&self, request: OrderRequest) -> Result<PlacedOrder, SubmitError> {
        let request = self.reprice(request)?;

        let quote = self
            .pricing
            .quote(&request)
            .map_err(|error| SubmitError::Rejected(error.to_string()))?;

        let order = Order::place(request, quote, Timestamp::now());
        let placed = PlacedOrder {
            uuid: order.uuid,
            quote,
        };

        info!(
            order = %order.uuid,
            restaurant = %order.restaurant_id,
            total = %quote.total,
            "order accepted"
        );

        self.orders.lock().await.push(order);

        Ok(placed)
    }
}
