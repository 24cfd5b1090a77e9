//! Transfer amounts
//!
//! The text form of an amount is the exact message that gets signed, so it
//! must be stable. Digits are the shortest that round-trip. When the decimal
//! exponent is in `-4..16` the value is written in positional form, with a
//! trailing `.0` for integral values (`10` -> `"10.0"`, `1.5` -> `"1.5"`).
//! Outside that range it is written as mantissa plus a signed exponent of at
//! least two digits (`0.00001` -> `"1e-05"`, `1e16` -> `"1e+16"`).

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A non-negative, finite transfer amount in FTR
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidAmount(format!("{} is not a finite number", value)));
        }
        if value < 0.0 {
            return Err(Error::InvalidAmount(format!("{} is negative", value)));
        }
        // Collapse -0.0 so it never renders as "-0.0"
        Ok(Self(value + 0.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// The UTF-8 message covered by the signature
    pub fn signing_text(&self) -> String {
        self.to_string()
    }
}

/// Positional form is used for decimal exponents in this range
const POSITIONAL_EXPONENTS: std::ops::Range<i32> = -4..16;

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scientific = format!("{:e}", self.0);
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);

        if !POSITIONAL_EXPONENTS.contains(&exponent) {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
        } else if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(format!("'{}' is not a number", s.trim())))?;
        Self::new(value)
    }
}
