//! Field lines traced through magnetic field models.

pub mod generator;
pub mod invariant;
pub mod query;

use super::ftr;
use crate::{
    geometry::{Point3, Vec3},
    units::{NanoTesla, Radii},
};
use std::fmt;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// A point on a traced field line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct TracePoint {
    position: Point3<ftr>,
    field: Vec3<ftr>,
    longitudinal_invariant: Option<ftr>,
}

/// How one end of a field line came to be.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub enum Termination {
    /// The next step would have ended inside the inner limit.
    InnerBoundary,
    /// The next step would have ended outside the outer limit.
    OuterBoundary,
    /// The maximum number of steps for the field line was used up.
    StepLimit,
}

/// A field line consisting of an ordered sequence of trace points.
///
/// The points run from the end reached by stepping opposite to the field,
/// through the seed point, to the end reached by stepping along the field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct FieldLine {
    points: Vec<TracePoint>,
    seed_index: usize,
    terminations: [Termination; 2],
}

impl TracePoint {
    /// Creates a new trace point without a longitudinal invariant.
    pub fn new(position: Point3<ftr>, field: Vec3<ftr>) -> Self {
        Self {
            position,
            field,
            longitudinal_invariant: None,
        }
    }

    /// Creates a new trace point with the given longitudinal invariant.
    pub fn with_longitudinal_invariant(
        position: Point3<ftr>,
        field: Vec3<ftr>,
        longitudinal_invariant: ftr,
    ) -> Self {
        Self {
            position,
            field,
            longitudinal_invariant: Some(longitudinal_invariant),
        }
    }

    /// Returns a reference to the position of the point [planetary radii].
    pub fn position(&self) -> &Point3<ftr> {
        &self.position
    }

    /// Returns a reference to the magnetic field vector at the point [nT].
    pub fn field(&self) -> &Vec3<ftr> {
        &self.field
    }

    /// Returns the magnetic field strength at the point.
    pub fn field_strength(&self) -> NanoTesla<ftr> {
        NanoTesla::new(self.field.length())
    }

    /// Returns the distance of the point from the planet centre.
    pub fn radial_distance(&self) -> Radii<ftr> {
        Radii::new(self.position.distance_from_origin())
    }

    /// Returns the longitudinal invariant K [sqrt(nT) planetary radii] at the
    /// point, if it has been calculated.
    pub fn longitudinal_invariant(&self) -> Option<ftr> {
        self.longitudinal_invariant
    }

    fn set_longitudinal_invariant(&mut self, longitudinal_invariant: ftr) {
        self.longitudinal_invariant = Some(longitudinal_invariant);
    }
}

impl fmt::Display for TracePoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.position, self.field_strength())?;
        if let Some(longitudinal_invariant) = self.longitudinal_invariant {
            write!(f, " K = {}", longitudinal_invariant)?;
        }
        Ok(())
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::InnerBoundary => "inner boundary",
                Self::OuterBoundary => "outer boundary",
                Self::StepLimit => "step limit",
            }
        )
    }
}

impl FieldLine {
    /// Assembles a field line from its points.
    ///
    /// # Parameters
    ///
    /// - `points`: Points ordered from the start end to the finish end.
    /// - `seed_index`: Index of the seed point among `points`.
    /// - `terminations`: How the start and finish ends were reached.
    pub fn new(points: Vec<TracePoint>, seed_index: usize, terminations: [Termination; 2]) -> Self {
        assert!(
            seed_index < points.len(),
            "Seed index must be smaller than the number of points."
        );
        Self {
            points,
            seed_index,
            terminations,
        }
    }

    /// Returns a slice of the points making up the field line.
    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    /// Consumes the field line and returns its points.
    pub fn into_points(self) -> Vec<TracePoint> {
        self.points
    }

    /// Returns the number of points making up the field line.
    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the index of the seed point.
    pub fn seed_index(&self) -> usize {
        self.seed_index
    }

    /// Returns a reference to the seed point.
    pub fn seed_point(&self) -> &TracePoint {
        &self.points[self.seed_index]
    }

    /// Returns how the start and finish ends of the field line were reached.
    pub fn terminations(&self) -> [Termination; 2] {
        self.terminations
    }

    /// Whether both ends of the field line reached the inner boundary.
    pub fn is_closed(&self) -> bool {
        self.terminations
            .iter()
            .all(|&termination| termination == Termination::InnerBoundary)
    }

    /// Computes the length of the field line as the sum of the distances
    /// between consecutive points.
    pub fn length(&self) -> Radii<ftr> {
        Radii::new(
            self.segment_lengths()
                .iter()
                .fold(0.0, |length, &segment_length| length + segment_length),
        )
    }

    /// Whether the longitudinal invariant has been calculated for every point.
    pub fn has_longitudinal_invariants(&self) -> bool {
        self.points
            .iter()
            .all(|point| point.longitudinal_invariant.is_some())
    }

    fn field_strengths(&self) -> Vec<ftr> {
        self.points
            .iter()
            .map(|point| point.field_strength().value())
            .collect()
    }

    fn segment_lengths(&self) -> Vec<ftr> {
        self.points
            .windows(2)
            .map(|pair| pair[0].position.distance_to(&pair[1].position))
            .collect()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn straight_line() -> FieldLine {
        let points = (0..4)
            .map(|idx| {
                TracePoint::new(
                    Point3::new(2.0, 0.0, 0.5 * idx as ftr),
                    Vec3::new(0.0, 0.0, 1.0),
                )
            })
            .collect();
        FieldLine::new(
            points,
            1,
            [Termination::InnerBoundary, Termination::OuterBoundary],
        )
    }

    #[test]
    fn field_line_reports_basic_properties() {
        let field_line = straight_line();
        assert_eq!(field_line.number_of_points(), 4);
        assert_eq!(field_line.seed_point().position()[crate::geometry::Dim3::Z], 0.5);
        assert_eq!(field_line.length(), Radii::new(1.5));
        assert!(!field_line.is_closed());
        assert!(!field_line.has_longitudinal_invariants());

        let points = field_line.into_points();
        assert_eq!(points.len(), 4);
        assert_eq!(points[3].radial_distance(), Radii::new(2.5));
    }

    #[test]
    #[should_panic]
    fn seed_index_outside_points_panics() {
        FieldLine::new(
            Vec::new(),
            0,
            [Termination::StepLimit, Termination::StepLimit],
        );
    }
}
