//! Physical quantities with explicit units.
//!
//! Lengths are measured in planetary radii and magnetic field strengths in
//! nanotesla. The wrappers only combine with values of the same unit, so a
//! length can not accidentally be added to a field strength. Conversions to
//! other units are explicit.

use crate::num::BFloat;
use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Floating-point precision to use for units.
#[allow(non_camel_case_types)]
pub type fun = f64;

/// Number of nanotesla in one tesla.
pub const NANOTESLA_PER_TESLA: fun = 1e9;
/// Number of nanotesla in one gauss.
pub const NANOTESLA_PER_GAUSS: fun = 1e5;

macro_rules! impl_quantity {
    ($Q:ident, $symbol:expr) => {
        impl<F: BFloat> $Q<F> {
            /// Wraps the given value.
            pub fn new(value: F) -> Self {
                Self(value)
            }

            /// Creates a zero quantity.
            pub fn zero() -> Self {
                Self(F::zero())
            }

            /// Returns the wrapped value.
            pub fn value(self) -> F {
                self.0
            }

            /// Returns the absolute value of the quantity.
            pub fn abs(self) -> Self {
                Self(num::Float::abs(self.0))
            }

            /// Whether the wrapped value is finite.
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Returns the larger of the two quantities.
            pub fn max(self, other: Self) -> Self {
                Self(F::max(self.0, other.0))
            }

            /// Returns the smaller of the two quantities.
            pub fn min(self, other: Self) -> Self {
                Self(F::min(self.0, other.0))
            }
        }

        impl<F: BFloat> Add for $Q<F> {
            type Output = Self;
            fn add(self, other: Self) -> Self::Output {
                Self(self.0 + other.0)
            }
        }

        impl<F: BFloat> AddAssign for $Q<F> {
            fn add_assign(&mut self, other: Self) {
                self.0 = self.0 + other.0;
            }
        }

        impl<F: BFloat> Sub for $Q<F> {
            type Output = Self;
            fn sub(self, other: Self) -> Self::Output {
                Self(self.0 - other.0)
            }
        }

        impl<F: BFloat> SubAssign for $Q<F> {
            fn sub_assign(&mut self, other: Self) {
                self.0 = self.0 - other.0;
            }
        }

        impl<F: BFloat> Neg for $Q<F> {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl<F: BFloat> Mul<F> for $Q<F> {
            type Output = Self;
            fn mul(self, factor: F) -> Self::Output {
                Self(self.0 * factor)
            }
        }

        impl<F: BFloat> Div<F> for $Q<F> {
            type Output = Self;
            fn div(self, divisor: F) -> Self::Output {
                Self(self.0 / divisor)
            }
        }

        /// Dividing two quantities of the same unit gives a plain ratio.
        impl<F: BFloat> Div for $Q<F> {
            type Output = F;
            fn div(self, divisor: Self) -> Self::Output {
                self.0 / divisor.0
            }
        }

        impl<F: BFloat> PartialOrd for $Q<F> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                self.0.partial_cmp(&other.0)
            }
        }

        impl<F: BFloat> fmt::Display for $Q<F> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)?;
                write!(f, " {}", $symbol)
            }
        }
    };
}

/// A length measured in planetary radii.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Radii<F>(F);

impl_quantity!(Radii, "R");

impl<F: BFloat> Radii<F> {
    /// Converts a length in kilometers, given the planetary radius in kilometers.
    pub fn from_kilometers(kilometers: F, planet_radius_km: F) -> Self {
        Self(kilometers / planet_radius_km)
    }

    /// Converts the length to kilometers, given the planetary radius in kilometers.
    pub fn to_kilometers(self, planet_radius_km: F) -> F {
        self.0 * planet_radius_km
    }
}

/// A magnetic field strength measured in nanotesla.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct NanoTesla<F>(F);

impl_quantity!(NanoTesla, "nT");

impl<F: BFloat> NanoTesla<F> {
    /// Converts a field strength in tesla.
    pub fn from_tesla(tesla: F) -> Self {
        Self(tesla * Self::factor(NANOTESLA_PER_TESLA))
    }

    /// Converts the field strength to tesla.
    pub fn to_tesla(self) -> F {
        self.0 / Self::factor(NANOTESLA_PER_TESLA)
    }

    /// Converts a field strength in gauss.
    pub fn from_gauss(gauss: F) -> Self {
        Self(gauss * Self::factor(NANOTESLA_PER_GAUSS))
    }

    /// Converts the field strength to gauss.
    pub fn to_gauss(self) -> F {
        self.0 / Self::factor(NANOTESLA_PER_GAUSS)
    }

    fn factor(value: fun) -> F {
        F::from_f64(value).expect("Conversion failed")
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::constants::EARTH_RADIUS_KM;
    use approx::assert_relative_eq;

    #[test]
    fn arithmetic_stays_within_unit() {
        let a = Radii::new(1.5);
        let b = Radii::new(0.25);
        assert_eq!(a + b, Radii::new(1.75));
        assert_eq!(a - b, Radii::new(1.25));
        assert_eq!(-a, Radii::new(-1.5));
        assert_eq!(a * 2.0, Radii::new(3.0));
        assert_eq!(a / 2.0, Radii::new(0.75));
        assert_eq!(a / b, 6.0);
        assert!(b < a);
    }

    #[test]
    fn unit_conversions_are_explicit() {
        let length = Radii::from_kilometers(12742.4, EARTH_RADIUS_KM);
        assert_relative_eq!(length.value(), 2.0);
        assert_relative_eq!(length.to_kilometers(EARTH_RADIUS_KM), 12742.4);

        let strength = NanoTesla::from_tesla(3.0e-5);
        assert_relative_eq!(strength.value(), 30000.0);
        assert_relative_eq!(strength.to_gauss(), 0.3);
        assert_relative_eq!(NanoTesla::from_gauss(0.3).to_tesla(), 3.0e-5);
    }

    #[test]
    fn quantities_display_their_unit() {
        assert_eq!(format!("{}", NanoTesla::new(12.5)), "12.5 nT");
        assert_eq!(format!("{}", Radii::new(2.0)), "2 R");
    }
}
