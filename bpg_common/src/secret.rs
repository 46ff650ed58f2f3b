//! A wrapper for values that must never appear in logs.
//!
//! The gateway API key secret and the JWT signing key both travel through configuration structs
//! that are debug-printed during startup. Wrapping them in [`Secret`] makes the mask the default;
//! leaking one takes an explicit [`Secret::reveal`] call at the point of use.

use std::fmt;

/// The replacement text printed in place of a wrapped value.
pub const MASK: &str = "********";

#[derive(Clone, Default)]
pub struct Secret<T> {
    value: T,
}

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Hands out the wrapped value. Keep the result away from format strings.
    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}
