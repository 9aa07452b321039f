//! Error types for orflib.
//!
//! Every failure in the library is synchronous and fatal to the call that
//! raised it.  The enum below groups failures by origin: bad inputs, violated
//! numerical preconditions, and quantities derived during curve bootstrap.
//! The `ensure!`, `ensure_arg!`, and `fail!` macros are the shorthand used to
//! raise them.

use thiserror::Error;

/// The top-level error type used throughout orflib.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Numerical precondition violated (grid too small, unsupported
    /// boundary condition, degenerate bounds, ...).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Invalid input (non-positive strike, out-of-order maturities,
    /// mismatched per-factor sizes, malformed configuration, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bootstrapped forward quantity came out negative.
    #[error("negative forward {quantity} between T1 = {t1} and T2 = {t2}")]
    NegativeForward {
        /// The quantity being bootstrapped ("rate" or "variance").
        quantity: &'static str,
        /// Start of the offending interval.
        t1: f64,
        /// End of the offending interval.
        t2: f64,
    },

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },
}

/// Shorthand `Result` type used throughout orflib.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use orf_core::{ensure, errors::Error};
/// fn big_enough(n: usize) -> orf_core::errors::Result<usize> {
///     ensure!(n >= 4, "grid is too small: {n} nodes");
///     Ok(n)
/// }
/// assert!(big_enough(10).is_ok());
/// assert!(matches!(big_enough(3), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::InvalidArgument(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use orf_core::{ensure_arg, errors::Error};
/// fn positive(x: f64) -> orf_core::errors::Result<f64> {
///     ensure_arg!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidArgument(_))));
/// ```
#[macro_export]
macro_rules! ensure_arg {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidArgument(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use orf_core::{fail, errors::Error};
/// fn always_err() -> orf_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(x: f64) -> Result<f64> {
        ensure_arg!(x > 0.0, "x must be positive, got {x}");
        Ok(x)
    }

    fn check_size(n: usize) -> Result<usize> {
        ensure!(n >= 4, "grid is too small");
        Ok(n)
    }

    #[test]
    fn macros_map_to_their_variants() {
        assert_eq!(check_positive(2.0), Ok(2.0));
        assert!(matches!(check_positive(0.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(check_size(2), Err(Error::Precondition(_))));
    }

    #[test]
    fn negative_forward_message_names_the_interval() {
        let e = Error::NegativeForward {
            quantity: "variance",
            t1: 1.0,
            t2: 2.0,
        };
        assert_eq!(e.to_string(), "negative forward variance between T1 = 1 and T2 = 2");
    }
}
