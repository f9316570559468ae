//! Monetary amounts
//!
//! Amounts are fixed-point with exactly 2 decimal places, matching the
//! NUMERIC(12, 2) column they are stored in. Constructed amounts are always
//! strictly positive: ledger entries are never recorded as zero.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Widest value that fits NUMERIC(12, 2): 9_999_999_999.99.
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Validated monetary amount, positive, 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Parse a form-submitted amount string.
    ///
    /// Rejects empty input, non-numeric input, zero, negatives, and values
    /// too wide for the storage column. Extra decimal places are rounded
    /// half-up to 2, the way the ledger stores them.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "amount" });
        }

        let value: Decimal = s.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "amount",
            reason: "must be a decimal number",
        })?;

        Self::new(value)
    }

    /// Validate an already-parsed decimal.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::InvalidFormat {
                field: "amount",
                reason: "must be greater than zero",
            });
        }
        if value > MAX_AMOUNT {
            return Err(ValidationError::InvalidFormat {
                field: "amount",
                reason: "exceeds the maximum supported amount",
            });
        }
        Ok(Self(
            value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        ))
    }

    /// The underlying decimal, rescaled to 2 places.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
