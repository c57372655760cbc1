//! Physical constants.

/// Floating-point precision to use for constants.
#[allow(non_camel_case_types)]
pub type fcn = f64;

/// IGRF reference radius of the Earth [km].
pub const EARTH_RADIUS_KM: fcn = 6371.2;

/// Magnitude of the equatorial surface field of a centred dipole
/// approximating the geomagnetic field [nT].
pub const EARTH_DIPOLE_FIELD: fcn = 30000.0;
