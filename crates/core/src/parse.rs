//! Prices, delivery fees and tax rates written as text.

use std::str::FromStr;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors from reading prices, fees or tax rates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Not an "AMOUNT CODE" pair with a decimal amount
    #[error("{0:?} is not a price like \"10.00 GBP\"")]
    InvalidPrice(String),

    /// More decimal places than the currency has minor units for
    #[error("{0:?} is more precise than its currency allows")]
    TooPrecise(String),

    /// Currency code not in ISO 4217
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),

    /// Fee priced in a different currency from the menu
    #[error("fee is in {found}, menu is priced in {expected}")]
    WrongCurrency {
        /// Menu currency
        expected: &'static str,

        /// Fee currency
        found: &'static str,
    },

    /// Negative delivery fee
    #[error("fee {0:?} is negative")]
    NegativeFee(String),

    /// Not a rate like "10%" or "0.1"
    #[error("{0:?} is not a tax rate like \"10%\" or \"0.1\"")]
    InvalidRate(String),

    /// Negative tax rate
    #[error("tax rate {0:?} is negative")]
    NegativeRate(String),
}

/// Read a price such as `"12.50 GBP"` as minor units and its currency.
///
/// The amount is scaled by the currency's exponent, so `"500 JPY"` is 500 minor units. The sign
/// is kept; callers decide whether negative amounts are allowed.
///
/// # Errors
///
/// - [`ParseError::InvalidPrice`]: not two fields, or the amount is not a decimal number.
/// - [`ParseError::UnknownCurrency`]: the code is not an ISO currency.
/// - [`ParseError::TooPrecise`]: the amount has more decimal places than the currency.
pub fn parse_price(text: &str) -> Result<(i64, &'static Currency), ParseError> {
    let invalid = || ParseError::InvalidPrice(text.to_string());

    let mut fields = text.split_whitespace();
    let (Some(amount), Some(code), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(invalid());
    };

    let amount = Decimal::from_str(amount).map_err(|_err| invalid())?.normalize();
    let currency = iso::find(code).ok_or_else(|| ParseError::UnknownCurrency(code.to_string()))?;

    if amount.scale() > currency.exponent {
        return Err(ParseError::TooPrecise(text.to_string()));
    }

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|scale| amount.checked_mul(Decimal::from(scale)))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(invalid)?;

    Ok((minor_units, currency))
}

/// Read a flat delivery fee, which must be non-negative and in the menu's currency.
///
/// # Errors
///
/// Any [`parse_price`] error, plus [`ParseError::NegativeFee`] and
/// [`ParseError::WrongCurrency`].
pub fn parse_fee(
    text: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, ParseError> {
    let (minor_units, fee_currency) = parse_price(text)?;

    if fee_currency != currency {
        return Err(ParseError::WrongCurrency {
            expected: currency.iso_alpha_code,
            found: fee_currency.iso_alpha_code,
        });
    }

    if minor_units < 0 {
        return Err(ParseError::NegativeFee(text.to_string()));
    }

    Ok(Money::from_minor(minor_units, currency))
}

/// Read a tax rate, either as a percentage (`"10%"`) or a fraction (`"0.1"`).
///
/// # Errors
///
/// [`ParseError::InvalidRate`] if the number does not parse, [`ParseError::NegativeRate`] if it
/// is below zero.
pub fn parse_tax_rate(text: &str) -> Result<Percentage, ParseError> {
    let trimmed = text.trim();
    let (number, hundredths) = match trimmed.strip_suffix('%') {
        Some(number) => (number.trim_end(), true),
        None => (trimmed, false),
    };

    let mut rate =
        Decimal::from_str(number).map_err(|_err| ParseError::InvalidRate(text.to_string()))?;

    if hundredths {
        rate /= Decimal::ONE_HUNDRED;
    }

    if rate < Decimal::ZERO {
        return Err(ParseError::NegativeRate(text.to_string()));
    }

    Ok(Percentage::from(rate))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP, JPY, USD};

    use super::*;

    #[test]
    fn price_reads_amount_and_currency() -> Result<(), ParseError> {
        assert_eq!(parse_price("12.50 GBP")?, (12_50, GBP));
        assert_eq!(parse_price("  3 USD ")?, (3_00, USD));
        assert_eq!(parse_price("-1.5 EUR")?, (-1_50, EUR));

        Ok(())
    }

    #[test]
    fn price_uses_currency_exponent() -> Result<(), ParseError> {
        assert_eq!(parse_price("500 JPY")?, (500, JPY));
        assert_eq!(
            parse_price("500.5 JPY"),
            Err(ParseError::TooPrecise("500.5 JPY".to_string()))
        );

        Ok(())
    }

    #[test]
    fn trailing_zeros_are_not_extra_precision() -> Result<(), ParseError> {
        assert_eq!(parse_price("2.500 GBP")?, (2_50, GBP));

        Ok(())
    }

    #[test]
    fn sub_minor_unit_price_is_rejected() {
        assert!(matches!(
            parse_price("1.005 GBP"),
            Err(ParseError::TooPrecise(_))
        ));
    }

    #[test]
    fn malformed_prices_are_rejected() {
        for text in ["2.99GBP", "GBP", "", "1.00 GBP extra", "one GBP"] {
            assert!(
                matches!(parse_price(text), Err(ParseError::InvalidPrice(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_currency_is_named() {
        assert_eq!(
            parse_price("2.99 ABC"),
            Err(ParseError::UnknownCurrency("ABC".to_string()))
        );
    }

    #[test]
    fn fee_must_match_menu_currency() -> Result<(), ParseError> {
        assert_eq!(parse_fee("5.00 USD", USD)?, Money::from_minor(5_00, USD));
        assert_eq!(
            parse_fee("5.00 USD", GBP),
            Err(ParseError::WrongCurrency {
                expected: "GBP",
                found: "USD"
            })
        );

        Ok(())
    }

    #[test]
    fn negative_fee_is_rejected() -> Result<(), ParseError> {
        assert_eq!(parse_fee("0 GBP", GBP)?, Money::from_minor(0, GBP));
        assert!(matches!(
            parse_fee("-0.01 GBP", GBP),
            Err(ParseError::NegativeFee(_))
        ));

        Ok(())
    }

    #[test]
    fn tax_rate_accepts_percent_and_fraction() -> Result<(), ParseError> {
        let fifteen = Percentage::from(Decimal::new(15, 2));

        assert_eq!(parse_tax_rate("15%")?, fifteen);
        assert_eq!(parse_tax_rate(" 15 % ")?, fifteen);
        assert_eq!(parse_tax_rate("0.15")?, fifteen);
        assert_eq!(parse_tax_rate("0%")?, Percentage::from(Decimal::ZERO));

        Ok(())
    }

    #[test]
    fn tax_rate_rejects_non_numbers() {
        for text in ["ten percent", "NaN", "inf", "%", ""] {
            assert!(
                matches!(parse_tax_rate(text), Err(ParseError::InvalidRate(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn negative_tax_rate_is_rejected() {
        assert_eq!(
            parse_tax_rate("-5%"),
            Err(ParseError::NegativeRate("-5%".to_string()))
        );
    }
}
