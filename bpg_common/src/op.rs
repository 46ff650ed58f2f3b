//! Implements the standard arithmetic traits for transparent single-field newtypes.

#[macro_export]
macro_rules! op {
    (binary $t:ty, $op:ident, $f:ident) => {
        impl $op for $t {
            type Output = Self;

            fn $f(self, rhs: Self) -> Self::Output {
                Self(self.0.$f(rhs.0))
            }
        }
    };
    (inplace $t:ty, $op:ident, $f:ident) => {
        impl $op for $t {
            fn $f(&mut self, rhs: Self) {
                self.0.$f(rhs.0);
            }
        }
    };
    (unary $t:ty, $op:ident, $f:ident) => {
        impl $op for $t {
            type Output = Self;

            fn $f(self) -> Self::Output {
                Self(self.0.$f())
            }
        }
    };
}
