//! Native asset denominations and exact minor-unit conversion.
//!
//! Minor units (wei, lamports) are the only values ever signed, so every
//! conversion here is integer arithmetic on decimal strings. No floats.

use core::fmt;

use crate::error::{Error, Result};

/// How to treat fractional digits beyond a denomination's precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    /// Reject amounts that cannot be represented exactly.
    #[default]
    Exact,
    /// Drop excess digits (round toward zero).
    TowardZero,
}

/// A native asset with a fixed power-of-ten minor-unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Denomination {
    decimals: u8,
    symbol: &'static str,
    rounding: RoundingMode,
}

impl Denomination {
    /// Largest precision whose scale fits in a `u128`.
    pub const MAX_DECIMALS: u8 = 38;

    /// Create a denomination with `decimals` fractional digits.
    ///
    /// # Panics
    ///
    /// Panics if `decimals` exceeds [`Self::MAX_DECIMALS`].
    #[must_use]
    pub const fn new(decimals: u8, symbol: &'static str, rounding: RoundingMode) -> Self {
        assert!(
            decimals <= Self::MAX_DECIMALS,
            "denomination precision exceeds 38 decimals"
        );
        Self {
            decimals,
            symbol,
            rounding,
        }
    }

    /// Number of fractional digits in one display unit.
    #[inline]
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Ticker symbol.
    #[inline]
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Rounding rule applied by [`Self::to_minor_units`].
    #[inline]
    #[must_use]
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Same denomination with a different rounding rule.
    #[must_use]
    pub const fn with_rounding(self, rounding: RoundingMode) -> Self {
        Self { rounding, ..self }
    }

    /// Minor units per display unit (`10^decimals`).
    #[must_use]
    pub const fn scale(&self) -> u128 {
        10u128.pow(self.decimals as u32)
    }

    /// Parse a display amount such as `"1.5"` into minor units.
    ///
    /// Accepts an optional leading `+`, digits, and at most one `.`.
    /// The result must be strictly positive.
    pub fn to_minor_units(&self, display: &str) -> Result<u128> {
        let text = display.trim();
        let unsigned = text.strip_prefix('+').unwrap_or(text);
        if unsigned.starts_with('-') {
            return Err(Error::InvalidAmount(format!("{text} is negative")));
        }

        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(Error::InvalidAmount(format!("'{text}' is not a number")));
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAmount(format!("'{text}' is not a number")));
        }

        let decimals = usize::from(self.decimals);
        let frac = if frac.len() > decimals {
            let (kept, dropped) = frac.split_at(decimals);
            if self.rounding == RoundingMode::Exact && dropped.bytes().any(|b| b != b'0') {
                return Err(Error::InvalidAmount(format!(
                    "{text} has more than {decimals} decimal places"
                )));
            }
            kept
        } else {
            frac
        };

        let overflow = || Error::InvalidAmount(format!("{text} is too large"));
        let whole_units = parse_digits(whole).ok_or_else(overflow)?;
        let frac_units = parse_digits(frac).ok_or_else(overflow)?
            * 10u128.pow((decimals - frac.len()) as u32);

        let minor = whole_units
            .checked_mul(self.scale())
            .and_then(|v| v.checked_add(frac_units))
            .ok_or_else(overflow)?;

        if minor == 0 {
            return Err(Error::InvalidAmount(format!(
                "{text} must be greater than zero"
            )));
        }
        Ok(minor)
    }

    /// Render minor units as a display amount, without trailing zeros.
    #[must_use]
    pub fn to_display_units(&self, minor: u128) -> String {
        let scale = self.scale();
        let whole = minor / scale;
        let frac = minor % scale;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{frac:0width$}", width = usize::from(self.decimals));
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }

    /// Like [`Self::to_display_units`], suffixed with the symbol.
    #[must_use]
    pub fn format(&self, minor: u128) -> String {
        format!("{} {}", self.to_display_units(minor), self.symbol)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

fn parse_digits(digits: &str) -> Option<u128> {
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok()
}
