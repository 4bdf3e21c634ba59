//! Fixed-point money type.
//!
//! All money amounts use a 1e-2 (cents) fixed-point representation stored as
//! `i64`. `Cents` wraps the raw integer so amounts cannot be mixed with
//! counts or ids by accident. There is no `From<i64>`; use [`Cents::new`].
//!
//! Decimal strings are converted with [`parse_amount`], which never touches
//! floating point and caps a single amount at [`MAX_AMOUNT`].
//!
//! Arithmetic saturates at the `i64` bounds, so aggregates over any ledger
//! never panic.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Cents per currency unit.
pub const CENTS_SCALE: i64 = 100;

/// Largest amount [`parse_amount`] accepts: 100 billion units.
pub const MAX_AMOUNT: Cents = Cents(10_000_000_000_000);

// ---------------------------------------------------------------------------
// Cents newtype
// ---------------------------------------------------------------------------

/// A fixed-point monetary amount at 1e-2 scale.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    #[inline]
    pub const fn new(raw: i64) -> Self {
        Cents(raw)
    }

    /// Whole currency units, e.g. `Cents::units(3500)` = 3500.00.
    #[inline]
    pub const fn units(units: i64) -> Self {
        Cents(units * CENTS_SCALE)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn saturating_add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Cents {
    type Output = Cents;
    #[inline]
    fn add(self, rhs: Cents) -> Cents {
        self.saturating_add(rhs)
    }
}

impl Sub for Cents {
    type Output = Cents;
    #[inline]
    fn sub(self, rhs: Cents) -> Cents {
        self.saturating_sub(rhs)
    }
}

impl Neg for Cents {
    type Output = Cents;
    #[inline]
    fn neg(self) -> Cents {
        Cents(self.0.saturating_neg())
    }
}

impl AddAssign for Cents {
    #[inline]
    fn add_assign(&mut self, rhs: Cents) {
        *self = self.saturating_add(rhs);
    }
}

impl SubAssign for Cents {
    #[inline]
    fn sub_assign(&mut self, rhs: Cents) {
        *self = self.saturating_sub(rhs);
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Cents::saturating_add)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0 / CENTS_SCALE;
        let frac = (self.0 % CENTS_SCALE).abs();
        // -0.50 would lose its sign through integer division.
        if self.0 < 0 && units == 0 {
            write!(f, "-{units}.{frac:02}")
        } else {
            write!(f, "{units}.{frac:02}")
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    Empty,
    Invalid { raw: String },
    /// More than 2 decimal places would require rounding.
    TooManyDecimalPlaces { raw: String },
    /// Transaction amounts must be strictly positive.
    NonPositive { raw: String },
    /// Above [`MAX_AMOUNT`].
    TooLarge { raw: String },
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::Empty => write!(f, "amount is empty"),
            MoneyError::Invalid { raw } => write!(f, "amount could not be parsed: '{raw}'"),
            MoneyError::TooManyDecimalPlaces { raw } => {
                write!(f, "amount has more than 2 decimal places: '{raw}'")
            }
            MoneyError::NonPositive { raw } => write!(f, "amount must be > 0, got '{raw}'"),
            MoneyError::TooLarge { raw } => {
                write!(f, "amount exceeds {MAX_AMOUNT}: '{raw}'")
            }
        }
    }
}

impl std::error::Error for MoneyError {}

/// Convert a positive decimal string (`"3500"`, `"120.5"`, `"0.99"`) to
/// [`Cents`].
///
/// Rules:
/// - optional leading `+`; a leading `-` is rejected as non-positive
/// - at most 2 fractional digits
/// - zero is rejected
/// - anything above [`MAX_AMOUNT`] is rejected
pub fn parse_amount(s: &str) -> Result<Cents, MoneyError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(MoneyError::Empty);
    }
    if s.starts_with('-') {
        return Err(MoneyError::NonPositive { raw: s.to_string() });
    }
    let digits = s.strip_prefix('+').unwrap_or(s);
    let invalid = || MoneyError::Invalid { raw: s.to_string() };

    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty())
        || !all_digits(int_part)
        || !all_digits(frac_part)
    {
        return Err(invalid());
    }
    if frac_part.len() > 2 {
        return Err(MoneyError::TooManyDecimalPlaces { raw: s.to_string() });
    }

    let too_large = || MoneyError::TooLarge { raw: s.to_string() };
    // Only digits remain, so a parse failure here is overflow.
    let int_val: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| too_large())?
    };
    let frac_val: i64 = format!("{frac_part:0<2}").parse().map_err(|_| invalid())?;

    let cents = int_val
        .checked_mul(CENTS_SCALE)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(too_large)?;

    if cents == 0 {
        return Err(MoneyError::NonPositive { raw: s.to_string() });
    }
    if cents > MAX_AMOUNT.0 {
        return Err(too_large());
    }
    Ok(Cents(cents))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
