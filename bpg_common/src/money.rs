use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "INR";
/// The payment gateway expresses amounts in the smallest currency sub-unit (e.g. paise), while the
/// plan catalog and ledger store whole units. The scaling between the two is exactly this factor.
pub const SUBUNITS_PER_UNIT: i64 = 100;

//--------------------------------------       Money        ----------------------------------------------------------
/// An amount of money in whole currency units. Prices and ledger amounts are integral by design;
/// the only fractional quantity in the system (the annual discount) is rounded at computation time.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a money amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl TryFrom<u64> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(MoneyConversionError(format!("Value {} is too large to convert to Money", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.00", self.0)
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The amount in gateway sub-units. This scaling is a pure, reversible transform.
    pub fn to_subunits(&self) -> i64 {
        self.0 * SUBUNITS_PER_UNIT
    }

    pub fn from_subunits(subunits: i64) -> Self {
        Self(subunits / SUBUNITS_PER_UNIT)
    }
}
