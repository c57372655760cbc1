//! Command line interface for generating seed points.

pub mod equatorial;
pub mod manual;
