//! Centred dipole magnetic field.

use super::MagneticFieldModel;
use crate::{
    constants::EARTH_DIPOLE_FIELD,
    geometry::{
        Dim3::{X, Y, Z},
        Point3, Vec3,
    },
    tracing::ftr,
    units::NanoTesla,
};

/// Field of a dipole at the origin with its moment anti-parallel to the z-axis.
///
/// As for the Earth, the field points northward (along +z) in the equatorial
/// plane. Positions are in planetary radii, so the field strength at the
/// surface on the equator equals the configured equatorial surface field.
///
/// The model is symmetric under reflection through the `z = 0` plane and
/// under rotation about the z-axis. It is singular at the origin, where it
/// evaluates to a non-finite vector.
#[derive(Clone, Debug, PartialEq)]
pub struct DipoleFieldModel {
    equatorial_surface_field: ftr,
}

impl DipoleFieldModel {
    /// Creates a new dipole model with the given field strength at the
    /// equatorial surface.
    pub fn new(equatorial_surface_field: NanoTesla<ftr>) -> Self {
        Self {
            equatorial_surface_field: equatorial_surface_field.value(),
        }
    }

    /// Returns the field strength at the equatorial surface.
    pub fn equatorial_surface_field(&self) -> NanoTesla<ftr> {
        NanoTesla::new(self.equatorial_surface_field)
    }

    /// Computes the field strength where the field line with the given
    /// equatorial crossing distance (L-value) reaches the given magnetic latitude [rad].
    pub fn field_strength_on_field_line(&self, l_value: ftr, latitude: ftr) -> NanoTesla<ftr> {
        let sin_lat = latitude.sin();
        let cos_lat = latitude.cos();
        NanoTesla::new(
            self.equatorial_surface_field * (1.0 + 3.0 * sin_lat * sin_lat).sqrt()
                / (l_value.powi(3) * cos_lat.powi(6)),
        )
    }
}

impl Default for DipoleFieldModel {
    fn default() -> Self {
        Self::new(NanoTesla::new(EARTH_DIPOLE_FIELD))
    }
}

impl MagneticFieldModel for DipoleFieldModel {
    fn field(&self, position: &Point3<ftr>) -> Vec3<ftr> {
        let (x, y, z) = (position[X], position[Y], position[Z]);
        let squared_distance = position.squared_distance_from_origin();
        let distance_to_fifth =
            squared_distance * squared_distance * squared_distance.sqrt();

        // Products with z only change sign when z does, which keeps the field
        // exactly mirror symmetric about the equatorial plane.
        let transverse_coef = -3.0 * self.equatorial_surface_field * z / distance_to_fifth;
        Vec3::new(
            transverse_coef * x,
            transverse_coef * y,
            self.equatorial_surface_field * (squared_distance - 3.0 * z * z) / distance_to_fifth,
        )
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equatorial_field_points_north_and_falls_off_with_cube_of_distance() {
        let dipole = DipoleFieldModel::default();
        let field = dipole.field(&Point3::new(2.0, 0.0, 0.0));
        assert_eq!(field[X], 0.0);
        assert_eq!(field[Y], 0.0);
        assert_relative_eq!(field[Z], EARTH_DIPOLE_FIELD / 8.0);
    }

    #[test]
    fn polar_field_is_twice_the_equatorial_field() {
        let dipole = DipoleFieldModel::default();
        let field = dipole.field(&Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(field[Z], -2.0 * EARTH_DIPOLE_FIELD);
    }

    #[test]
    fn field_is_exactly_mirror_symmetric() {
        let dipole = DipoleFieldModel::default();
        let position = Point3::new(1.7, 0.3, 0.9);
        let field = dipole.field(&position);
        let mirrored_field = dipole.field(&position.reflected_across(Z));
        assert_eq!(mirrored_field[X], -field[X]);
        assert_eq!(mirrored_field[Y], -field[Y]);
        assert_eq!(mirrored_field[Z], field[Z]);
    }

    #[test]
    fn field_strength_on_field_line_matches_field() {
        let dipole = DipoleFieldModel::default();
        let (l_value, latitude): (ftr, ftr) = (3.0, 0.4);
        let r = l_value * latitude.cos().powi(2);
        let position = Point3::new(r * latitude.cos(), 0.0, r * latitude.sin());
        assert_relative_eq!(
            dipole.field_strength(&position).value(),
            dipole
                .field_strength_on_field_line(l_value, latitude)
                .value(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn field_is_not_finite_at_origin() {
        let dipole = DipoleFieldModel::default();
        assert!(!dipole.field(&Point3::origin()).is_finite());
    }
}
