//! Satoshi-denominated monetary amounts.
//!
//! Bitcoin amounts are represented as an integer count of satoshis
//! everywhere in this crate; BTC-denominated decimal strings are only a
//! display/parsing convenience and are converted exactly — no `f64` ever
//! touches an amount, since floating point cannot represent 0.1 BTC exactly.

use crate::error::Error;
use std::fmt;

/// Total satoshis ever to exist. Bitcoin's subsidy schedule halves to zero
/// before the 21,000,000 BTC round number is reached, so the real cap is
/// `20_999_999.9769` BTC.
pub const MAX_SATOSHI: u64 = 2_099_999_997_690_000;

/// `MAX_SATOSHI` expressed in BTC.
pub const MAX_BITCOIN: f64 = 20_999_999.9769;

const SATOSHIS_PER_BTC: u64 = 100_000_000;

/// An amount of bitcoin, stored as an exact satoshi count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "use-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_sat(sat: u64) -> Result<Self, Error> {
        if sat > MAX_SATOSHI {
            return Err(Error::value("amount exceeds the maximum possible supply"));
        }
        Ok(Amount(sat))
    }

    #[must_use]
    pub fn to_sat(self) -> u64 {
        self.0
    }

    /// Parse a decimal BTC string (`"1"`, `"0.5"`, `"21000000.00000001"`)
    /// with at most 8 digits after the point, converting exactly.
    pub fn from_btc_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::value("empty amount string"));
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if frac.len() > 8 {
            return Err(Error::value("amount has more than 8 fractional digits"));
        }
        if whole.is_empty() && frac.is_empty() {
            return Err(Error::value("amount has no digits"));
        }
        let whole_value: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| Error::value("whole part of amount is not a valid integer"))?
        };
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::value("fractional part of amount is not numeric"));
        }
        let mut frac_padded = frac.to_string();
        while frac_padded.len() < 8 {
            frac_padded.push('0');
        }
        let frac_value: u64 = if frac_padded.is_empty() {
            0
        } else {
            frac_padded
                .parse()
                .map_err(|_| Error::value("fractional part of amount is not a valid integer"))?
        };

        let whole_sat = whole_value
            .checked_mul(SATOSHIS_PER_BTC)
            .ok_or_else(|| Error::value("invalid BTC amount: exceeds MAX_BITCOIN"))?;
        let sat = whole_sat
            .checked_add(frac_value)
            .ok_or_else(|| Error::value("invalid BTC amount: exceeds MAX_BITCOIN"))?;
        if sat > MAX_SATOSHI {
            return Err(Error::value(format!("invalid BTC amount: exceeds MAX_BITCOIN ({MAX_BITCOIN})")));
        }
        Amount::from_sat(sat)
    }

    /// Render as a canonical decimal BTC string: exact, no scientific
    /// notation, and trimmed to the minimal number of trailing fractional
    /// zeros (a whole-BTC amount has no decimal point at all).
    #[must_use]
    pub fn to_btc_string(self) -> String {
        let whole = self.0 / SATOSHIS_PER_BTC;
        let frac = self.0 % SATOSHIS_PER_BTC;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{frac:08}");
        let trimmed = digits.trim_end_matches('0');
        format!("{whole}.{trimmed}")
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BTC", self.to_btc_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_whole_btc() {
        let amount = Amount::from_btc_str("1").unwrap();
        assert_eq!(amount.to_sat(), 100_000_000);
        assert_eq!(amount.to_btc_string(), "1");
    }

    #[test]
    fn round_trips_fractional_btc() {
        let amount = Amount::from_btc_str("0.00000001").unwrap();
        assert_eq!(amount.to_sat(), 1);
    }

    #[test]
    fn rejects_too_many_fractional_digits() {
        assert!(Amount::from_btc_str("1.123456789").is_err());
    }

    #[test]
    fn rejects_amount_above_max_supply() {
        assert!(Amount::from_sat(MAX_SATOSHI + 1).is_err());
    }

    #[test]
    fn max_supply_is_exactly_representable() {
        let amount = Amount::from_sat(MAX_SATOSHI).unwrap();
        assert_eq!(amount.to_btc_string(), "20999999.9769");
    }

    #[test]
    fn rejects_btc_string_above_max_bitcoin() {
        assert!(Amount::from_btc_str("21000000").is_err());
        assert!(Amount::from_btc_str("20999999.97690001").is_err());
    }

    #[test]
    fn rejects_empty_string() {
        assert!(Amount::from_btc_str("").is_err());
    }

    #[test]
    fn minimal_trailing_zeros_scenario() {
        let amount = Amount::from_btc_str("0.00010000").unwrap();
        assert_eq!(amount.to_sat(), 10_000);
        assert_eq!(amount.to_btc_string(), "0.0001");
        assert!(Amount::from_btc_str("0.123456789").is_err());
    }
}
