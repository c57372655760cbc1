//! Errors reported by the library, and macros for reporting them in the command line program.

use crate::{geometry::Point3, tracing::ftr};
use thiserror::Error;

/// An invalid set of field line tracing parameters.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("inner limit must be positive and finite, got {0}")]
    InnerLimit(ftr),
    #[error("outer limit ({outer}) must be finite and larger than the inner limit ({inner})")]
    OuterLimit { inner: ftr, outer: ftr },
    #[error("fail ratio must be finite and larger than one, got {0}")]
    FailRatio(ftr),
    #[error("maximum step size must be positive and finite, got {0}")]
    MaxStepSize(ftr),
    #[error("minimum step size ({min}) must be positive and not exceed the maximum step size ({max})")]
    MinStepSize { min: ftr, max: ftr },
    #[error("minimum step dot product must be finite and at most one, got {0}")]
    MinStepDotField(ftr),
    #[error("maximum step count must be positive")]
    MaxStepCount,
}

/// Failure to trace a field line.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TracingError {
    /// The stepping direction could not be resolved, even at the smallest
    /// allowed step size. The field line must be discarded.
    #[error("bifurcating field line at {position} (direction dot product {dot_product})")]
    BifurcatingFieldLine {
        position: Point3<ftr>,
        dot_product: ftr,
    },
}

/// Failure to answer a query on a field line.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("field line has no points")]
    EmptyFieldLine,
    #[error("longitudinal invariants have not been calculated for the field line")]
    MissingInvariants,
    #[error("longitudinal invariant {target} is outside the range [{min}, {max}] of the field line")]
    InvariantOutOfRange { target: ftr, min: ftr, max: ftr },
}

#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1);
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*);
    }};
}

#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}
