//! Dishcart
//!
//! Cart aggregation and checkout for a multi-restaurant food delivery service: a session cart
//! keyed by `(item, restaurant)`, per-restaurant grouping and totals, the checkout split policy,
//! order submission and the order pricing and status rules applied once an order is placed.

pub mod cart;
pub mod checkout;
pub mod ids;
pub mod menu;
pub mod orders;
pub mod parse;
pub mod prelude;
pub mod render;
