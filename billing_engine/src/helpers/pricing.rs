//! Plan price derivation.
//!
//! The catalog stores a single monthly rate per plan. The yearly rate is always derived from it
//! with a flat 20% discount, i.e. customers on a yearly cycle pay 4/5 of twelve monthly payments.
//! All arithmetic is integer arithmetic on whole currency units, rounded half away from zero, so
//! that the amount quoted to the gateway is reproducible from the catalog alone.

use bpg_common::Money;

use crate::db_types::BillingCycle;

pub const MONTHS_PER_YEAR: i64 = 12;
pub const YEARLY_DISCOUNT_NUM: i64 = 4;
pub const YEARLY_DISCOUNT_DEN: i64 = 5;

/// The amount due for one billing period of a plan with the given monthly rate.
pub fn amount_due(monthly_price: Money, cycle: BillingCycle) -> Money {
    match cycle {
        BillingCycle::Monthly => monthly_price,
        BillingCycle::Yearly => {
            let gross = monthly_price.value() * MONTHS_PER_YEAR * YEARLY_DISCOUNT_NUM;
            Money::from(div_round_half_away(gross, YEARLY_DISCOUNT_DEN))
        },
    }
}

/// Integer division rounding half away from zero.
fn div_round_half_away(num: i64, den: i64) -> i64 {
    let quotient = num / den;
    let remainder = num % den;
    if 2 * remainder.abs() >= den.abs() {
        quotient + num.signum() * den.signum()
    } else {
        quotient
    }
}
