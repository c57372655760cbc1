//! The `ubk` crate traces magnetic field lines through planetary magnetic
//! field models and computes the longitudinal invariant K of mirroring
//! particles along them.
//!
//! A [`FieldLineGenerator`](tracing::field_line::generator::FieldLineGenerator)
//! traces a field line from a seed point through any
//! [`MagneticFieldModel`](field::MagneticFieldModel), detecting field lines
//! whose direction cannot be resolved. The resulting
//! [`FieldLine`](tracing::field_line::FieldLine) can then be annotated with
//! longitudinal invariants and queried for mirror points.

pub mod constants;
pub mod error;
pub mod field;
pub mod geometry;
pub mod io;
pub mod num;
pub mod tracing;
pub mod units;

#[cfg(feature = "seeding")]
pub mod seeding;

#[cfg(feature = "cli")]
pub mod cli;
