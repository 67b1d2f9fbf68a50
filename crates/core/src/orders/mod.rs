//! Orders
//!
//! Server-side view of a placed order: pricing, status lifecycle and an in-process order book.

pub mod book;
pub mod models;
pub mod pricing;
pub mod status;

pub use book::LocalOrderBook;
pub use models::{Order, OrderError};
pub use pricing::{OrderPricing, OrderQuote, PricingError};
pub use status::{OrderStatus, PaymentStatus, StatusChange};
