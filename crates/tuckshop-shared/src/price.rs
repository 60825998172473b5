//! Price strings in the shop's `"<currency> <amount>"` convention.
//!
//! Prices are stored as free text on item documents. Only the first two
//! whitespace-separated tokens matter: the currency label and a whole-number
//! amount. Anything after the amount is ignored.

use std::fmt;
use std::str::FromStr;

use crate::error::PriceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub currency: String,
    pub amount: u64,
}

impl Price {
    pub fn new(currency: impl Into<String>, amount: u64) -> Self {
        Self {
            currency: currency.into(),
            amount,
        }
    }

    /// Price of `quantity` units, in the same currency.
    pub fn total(&self, quantity: u32) -> Result<Price, PriceError> {
        let amount = self
            .amount
            .checked_mul(u64::from(quantity))
            .ok_or(PriceError::Overflow {
                amount: self.amount,
                quantity,
            })?;
        Ok(Price::new(self.currency.clone(), amount))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let (Some(currency), Some(amount)) = (tokens.next(), tokens.next()) else {
            return Err(PriceError::MissingAmount(s.to_string()));
        };
        let amount = amount
            .parse::<u64>()
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;
        Ok(Price::new(currency, amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}
