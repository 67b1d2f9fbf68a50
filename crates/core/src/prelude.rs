//! Dishcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartCandidate, CartError, CartLine, QuantityChange, RestaurantGroup, grand_total},
    checkout::{
        CheckoutError, CheckoutOffer, CheckoutReport, CheckoutScope, CheckoutSelection,
        DeliveryAddress, OrderLine, OrderRequest, OrderSubmitter, PlacedOrder, SubmitError,
        submit_checkout,
    },
    ids::{ItemId, LineKey, RestaurantId},
    menu::{Menu, MenuError, MenuItem, Restaurant},
    orders::{
        LocalOrderBook, Order, OrderError, OrderPricing, OrderQuote, OrderStatus, PaymentStatus,
    },
    parse::{ParseError, parse_fee, parse_price, parse_tax_rate},
    render::{RenderError, write_cart, write_checkout_report, write_orders},
};
