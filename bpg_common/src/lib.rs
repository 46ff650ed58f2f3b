mod money;

pub mod op;
mod secret;

pub use money::{Money, MoneyConversionError, DEFAULT_CURRENCY_CODE, SUBUNITS_PER_UNIT};
pub use secret::Secret;
