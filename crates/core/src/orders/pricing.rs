//! Order pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::checkout::OrderRequest;

/// Errors that can occur while pricing an order.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The order has no lines.
    #[error("order has no items")]
    NoItems,

    /// A line total does not fit in minor units.
    #[error("order line total overflowed")]
    Overflow,

    /// The tax on the subtotal does not fit in minor units.
    #[error("tax on {0} minor units overflowed")]
    TaxOverflow(i64),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Breakdown of what the customer pays for one order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderQuote {
    /// Sum of unit price × quantity
    pub subtotal: Money<'static, Currency>,

    /// Tax on the subtotal
    pub tax: Money<'static, Currency>,

    /// Flat delivery charge
    pub delivery_fee: Money<'static, Currency>,

    /// Subtotal + tax + delivery fee
    pub total: Money<'static, Currency>,
}

/// Tax rate and delivery fee applied when an order is placed.
#[derive(Debug, Clone, Copy)]
pub struct OrderPricing {
    tax_rate: Percentage,
    delivery_fee: Money<'static, Currency>,
}

impl OrderPricing {
    /// Create a pricing policy.
    pub fn new(tax_rate: Percentage, delivery_fee: Money<'static, Currency>) -> Self {
        Self {
            tax_rate,
            delivery_fee,
        }
    }

    /// 10% tax and a flat 5.00 delivery fee.
    pub fn standard(currency: &'static Currency) -> Self {
        Self::new(
            Percentage::from(Decimal::new(10, 2)),
            Money::from_minor(5_00, currency),
        )
    }

    /// Returns the tax rate.
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Returns the delivery fee.
    pub fn delivery_fee(&self) -> Money<'static, Currency> {
        self.delivery_fee
    }

    /// Returns the currency orders are priced in.
    pub fn currency(&self) -> &'static Currency {
        self.delivery_fee.currency()
    }

    /// Price an order request.
    ///
    /// # Errors
    ///
    /// - [`PricingError::NoItems`]: the request has no lines.
    /// - [`PricingError::Overflow`]: a line total does not fit in minor units.
    /// - [`PricingError::TaxOverflow`]: the tax cannot be represented.
    /// - [`PricingError::Money`]: currency mismatch or money arithmetic failure.
    pub fn quote(&self, request: &OrderRequest) -> Result<OrderQuote, PricingError> {
        let first = request.items.first().ok_or(PricingError::NoItems)?;

        let subtotal = request.items.iter().try_fold(
            Money::from_minor(0, first.unit_price.currency()),
            |acc, line| -> Result<_, PricingError> {
                let minor = line
                    .unit_price
                    .to_minor_units()
                    .checked_mul(i64::from(line.quantity))
                    .ok_or(PricingError::Overflow)?;

                Ok(acc.add(Money::from_minor(minor, line.unit_price.currency()))?)
            },
        )?;

        let tax = Money::from_minor(self.tax_on(subtotal.to_minor_units())?, subtotal.currency());
        let total = subtotal.add(tax)?.add(self.delivery_fee)?;

        Ok(OrderQuote {
            subtotal,
            tax,
            delivery_fee: self.delivery_fee,
            total,
        })
    }

    /// Tax in minor units, half a minor unit rounding away from zero.
    fn tax_on(&self, subtotal: i64) -> Result<i64, PricingError> {
        let rate = self.tax_rate * Decimal::ONE;

        Decimal::from(subtotal)
            .checked_mul(rate)
            .map(|tax| tax.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|tax| tax.to_i64())
            .ok_or(PricingError::TaxOverflow(subtotal))
    }
}
