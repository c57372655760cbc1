//! Generation of seed points in the equatorial plane.

use super::Seeder3;
use crate::{geometry::Point3, tracing::ftr, units::Radii};
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use std::{f64::consts::PI, vec};

/// Generator for seed points in an annulus of the `z = 0` plane around the planet.
#[derive(Clone, Debug)]
pub struct EquatorialSeeder3 {
    seed_points: Vec<Point3<ftr>>,
}

impl EquatorialSeeder3 {
    /// Creates a new seeder producing seed points on a regular polar grid in
    /// the equatorial plane.
    ///
    /// # Parameters
    ///
    /// - `min_distance`: Radial distance of the innermost ring of points.
    /// - `max_distance`: Radial distance of the outermost ring of points.
    /// - `n_radial`: Number of rings (a single ring lies at `min_distance`).
    /// - `n_azimuthal`: Number of points on each ring, starting on the positive x-axis.
    ///
    /// # Returns
    ///
    /// A new `EquatorialSeeder3`.
    pub fn regular(
        min_distance: Radii<ftr>,
        max_distance: Radii<ftr>,
        n_radial: usize,
        n_azimuthal: usize,
    ) -> Self {
        let (min_distance, max_distance) = Self::check_distances(min_distance, max_distance);
        assert!(
            n_radial > 0 && n_azimuthal > 0,
            "Number of radial and azimuthal points must be larger than zero."
        );

        let radial_spacing = if n_radial > 1 {
            (max_distance - min_distance) / ((n_radial - 1) as ftr)
        } else {
            0.0
        };
        let azimuthal_spacing = 2.0 * PI / (n_azimuthal as ftr);

        let mut seed_points = Vec::with_capacity(n_radial * n_azimuthal);
        for i in 0..n_radial {
            let distance = min_distance + (i as ftr) * radial_spacing;
            for j in 0..n_azimuthal {
                seed_points.push(Self::equatorial_point(
                    distance,
                    (j as ftr) * azimuthal_spacing,
                ));
            }
        }
        EquatorialSeeder3 { seed_points }
    }

    /// Creates a new seeder producing seed points distributed uniformly by
    /// area in an annulus of the equatorial plane.
    ///
    /// # Parameters
    ///
    /// - `min_distance`: Inner radius of the annulus.
    /// - `max_distance`: Outer radius of the annulus.
    /// - `n_seeds`: Number of seed points to generate.
    /// - `rng`: Random number generator to draw from.
    ///
    /// # Returns
    ///
    /// A new `EquatorialSeeder3`.
    ///
    /// # Type parameters
    ///
    /// - `R`: Type of random number generator.
    pub fn random<R: Rng>(
        min_distance: Radii<ftr>,
        max_distance: Radii<ftr>,
        n_seeds: usize,
        rng: &mut R,
    ) -> Self {
        let (min_distance, max_distance) = Self::check_distances(min_distance, max_distance);

        // Squared radius is uniform for points uniform by area
        let squared_distance_samples = Uniform::new_inclusive(
            min_distance * min_distance,
            max_distance * max_distance,
        );
        let angle_samples = Uniform::new(0.0, 2.0 * PI);

        let seed_points = (0..n_seeds)
            .map(|_| {
                let distance = squared_distance_samples.sample(rng).sqrt();
                let angle = angle_samples.sample(rng);
                Self::equatorial_point(distance, angle)
            })
            .collect();
        EquatorialSeeder3 { seed_points }
    }

    fn check_distances(min_distance: Radii<ftr>, max_distance: Radii<ftr>) -> (ftr, ftr) {
        let (min_distance, max_distance) = (min_distance.value(), max_distance.value());
        assert!(
            min_distance.is_finite() && min_distance >= 0.0,
            "Minimum distance must be non-negative and finite."
        );
        assert!(
            max_distance.is_finite() && max_distance >= min_distance,
            "Maximum distance must be finite and not smaller than minimum distance."
        );
        (min_distance, max_distance)
    }

    fn equatorial_point(distance: ftr, angle: ftr) -> Point3<ftr> {
        Point3::new(distance * angle.cos(), distance * angle.sin(), 0.0)
    }
}

impl IntoIterator for EquatorialSeeder3 {
    type Item = Point3<ftr>;
    type IntoIter = vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.seed_points.into_iter()
    }
}

impl Seeder3 for EquatorialSeeder3 {
    fn number_of_points(&self) -> usize {
        self.seed_points.len()
    }

    fn retain_points<P>(&mut self, predicate: P)
    where
        P: FnMut(&Point3<ftr>) -> bool,
    {
        self.seed_points.retain(predicate);
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::geometry::Dim3::{X, Y, Z};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn regular_seeder_produces_polar_grid() {
        let seeder = EquatorialSeeder3::regular(Radii::new(2.0), Radii::new(4.0), 3, 4);
        assert_eq!(seeder.number_of_points(), 12);
        let points: Vec<_> = seeder.into_iter().collect();
        assert_eq!(points[0], Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(points[5][Y], 3.0, epsilon = 1e-12);
        assert_relative_eq!(points[11].distance_from_origin(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn random_seeder_stays_in_annulus() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seeder =
            EquatorialSeeder3::random(Radii::new(2.0), Radii::new(5.0), 200, &mut rng);
        assert_eq!(seeder.number_of_points(), 200);
        for point in seeder.clone() {
            let distance = point.distance_from_origin();
            assert!((2.0 - 1e-12..=5.0 + 1e-12).contains(&distance));
            assert_eq!(point[Z], 0.0);
        }
        seeder.retain_points(|point| point[X] > 0.0);
        assert!(seeder.number_of_points() < 200);
    }
}
