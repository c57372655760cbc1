//! Queries on field lines with calculated longitudinal invariants.

use super::{FieldLine, TracePoint};
use crate::{error::QueryError, num, tracing::ftr};

impl FieldLine {
    /// Returns the point with the smallest field strength.
    pub fn minimum_field_strength_point(&self) -> Result<&TracePoint, QueryError> {
        num::index_of_min(self.field_strengths())
            .map(|(idx, _)| &self.points[idx])
            .ok_or(QueryError::EmptyFieldLine)
    }

    /// Returns the point with the smallest longitudinal invariant.
    ///
    /// When several points share the smallest value, the first one is returned.
    pub fn minimum_invariant_point(&self) -> Result<&TracePoint, QueryError> {
        let invariants = self.longitudinal_invariants()?;
        num::index_of_min(invariants)
            .map(|(idx, _)| &self.points[idx])
            .ok_or(QueryError::EmptyFieldLine)
    }

    /// Returns the largest longitudinal invariant on the field line.
    pub fn max_longitudinal_invariant(&self) -> Result<ftr, QueryError> {
        self.longitudinal_invariants()?
            .into_iter()
            .reduce(ftr::max)
            .ok_or(QueryError::EmptyFieldLine)
    }

    /// Finds the two points, one on each side of the invariant minimum, where
    /// the longitudinal invariant equals the given target.
    ///
    /// Each half of the field line is searched outward from the minimum for
    /// the first pair of consecutive points bracketing the target. The
    /// returned point is linearly interpolated between them, with the
    /// invariant set to the target.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the points on the start side and the finish side of the minimum, in that order.
    /// - `Err`: Contains a `QueryError` if invariants are missing, or if the target is
    ///   below the minimum or above the largest value on either half.
    pub fn points_with_invariant(&self, target: ftr) -> Result<[TracePoint; 2], QueryError> {
        let invariants = self.longitudinal_invariants()?;
        let (min_idx, min_invariant) =
            num::index_of_min(invariants.iter().copied()).ok_or(QueryError::EmptyFieldLine)?;

        let max_start_invariant = invariants[..=min_idx]
            .iter()
            .copied()
            .fold(min_invariant, ftr::max);
        let max_finish_invariant = invariants[min_idx..]
            .iter()
            .copied()
            .fold(min_invariant, ftr::max);

        // Written so that a NaN target is out of range
        if !(target >= min_invariant
            && target <= max_start_invariant
            && target <= max_finish_invariant)
        {
            return Err(QueryError::InvariantOutOfRange {
                target,
                min: min_invariant,
                max: ftr::min(max_start_invariant, max_finish_invariant),
            });
        }

        let start_point = (0..min_idx)
            .rev()
            .find(|&idx| invariants[idx] >= target)
            .map_or_else(
                || self.point_at_minimum(min_idx, target),
                |idx| self.interpolate_point(&invariants, idx + 1, idx, target),
            );
        let finish_point = (min_idx + 1..invariants.len())
            .find(|&idx| invariants[idx] >= target)
            .map_or_else(
                || self.point_at_minimum(min_idx, target),
                |idx| self.interpolate_point(&invariants, idx - 1, idx, target),
            );

        Ok([start_point, finish_point])
    }

    fn longitudinal_invariants(&self) -> Result<Vec<ftr>, QueryError> {
        if self.points.is_empty() {
            return Err(QueryError::EmptyFieldLine);
        }
        self.points
            .iter()
            .map(|point| {
                point
                    .longitudinal_invariant()
                    .ok_or(QueryError::MissingInvariants)
            })
            .collect()
    }

    fn point_at_minimum(&self, min_idx: usize, target: ftr) -> TracePoint {
        let point = &self.points[min_idx];
        TracePoint::with_longitudinal_invariant(*point.position(), *point.field(), target)
    }

    /// Interpolates linearly from the inner point (closer to the minimum)
    /// toward the outer point.
    fn interpolate_point(
        &self,
        invariants: &[ftr],
        inner_idx: usize,
        outer_idx: usize,
        target: ftr,
    ) -> TracePoint {
        let inner = &self.points[inner_idx];
        let outer = &self.points[outer_idx];
        let invariant_difference = invariants[outer_idx] - invariants[inner_idx];
        let fraction = if invariant_difference > 0.0 {
            (target - invariants[inner_idx]) / invariant_difference
        } else {
            0.0
        };
        let position = inner.position() + &((outer.position() - inner.position()) * fraction);
        let field = inner.field() + &((outer.field() - inner.field()) * fraction);
        TracePoint::with_longitudinal_invariant(position, field, target)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        geometry::{
            Dim3::{X, Z},
            Point3, Vec3,
        },
        tracing::field_line::Termination,
    };
    use approx::assert_relative_eq;

    /// A straight field line along z through a parabolic field strength well.
    fn well_field_line(with_invariants: bool) -> FieldLine {
        let points = (-10..=10)
            .map(|idx| {
                let z = 0.1 * idx as ftr;
                TracePoint::new(Point3::new(2.0, 0.0, z), Vec3::new(0.0, 0.0, 1.0 + z * z))
            })
            .collect();
        let mut field_line = FieldLine::new(
            points,
            10,
            [Termination::InnerBoundary, Termination::InnerBoundary],
        );
        if with_invariants {
            field_line.calculate_longitudinal_invariants();
        }
        field_line
    }

    #[test]
    fn queries_require_invariants() {
        let field_line = well_field_line(false);
        assert_eq!(
            field_line.minimum_invariant_point(),
            Err(QueryError::MissingInvariants)
        );
        assert_eq!(
            field_line.points_with_invariant(0.1),
            Err(QueryError::MissingInvariants)
        );
        assert_eq!(
            field_line.max_longitudinal_invariant(),
            Err(QueryError::MissingInvariants)
        );
    }

    #[test]
    fn minimum_invariant_point_is_at_field_strength_minimum() {
        let field_line = well_field_line(true);
        let minimum = field_line.minimum_invariant_point().unwrap();
        assert_eq!(minimum.position()[Z], 0.0);
        assert_eq!(minimum.longitudinal_invariant(), Some(0.0));
        assert_eq!(
            field_line.minimum_field_strength_point().unwrap(),
            minimum
        );
    }

    #[test]
    fn points_with_invariant_are_symmetric_about_minimum() {
        let field_line = well_field_line(true);
        let max_invariant = field_line.max_longitudinal_invariant().unwrap();
        let target = 0.5 * max_invariant;
        let [start, finish] = field_line.points_with_invariant(target).unwrap();

        assert_eq!(start.longitudinal_invariant(), Some(target));
        assert_eq!(finish.longitudinal_invariant(), Some(target));
        assert!(start.position()[Z] < 0.0);
        assert_relative_eq!(start.position()[Z], -finish.position()[Z], epsilon = 1e-12);
        assert_eq!(start.position()[X], 2.0);
    }

    #[test]
    fn target_at_minimum_gives_minimum_point() {
        let field_line = well_field_line(true);
        let [start, finish] = field_line.points_with_invariant(0.0).unwrap();
        assert_eq!(start.position()[Z], 0.0);
        assert_eq!(finish.position()[Z], 0.0);
    }

    #[test]
    fn targets_outside_range_are_rejected() {
        let field_line = well_field_line(true);
        let max_invariant = field_line.max_longitudinal_invariant().unwrap();
        assert!(matches!(
            field_line.points_with_invariant(2.0 * max_invariant),
            Err(QueryError::InvariantOutOfRange { .. })
        ));
        assert!(matches!(
            field_line.points_with_invariant(-1.0),
            Err(QueryError::InvariantOutOfRange { .. })
        ));
    }

    #[test]
    fn empty_field_line_has_no_minimum() {
        let field_line = FieldLine {
            points: Vec::new(),
            seed_index: 0,
            terminations: [Termination::StepLimit, Termination::StepLimit],
        };
        assert_eq!(
            field_line.minimum_invariant_point(),
            Err(QueryError::EmptyFieldLine)
        );
        assert_eq!(
            field_line.minimum_field_strength_point(),
            Err(QueryError::EmptyFieldLine)
        );
    }
}
