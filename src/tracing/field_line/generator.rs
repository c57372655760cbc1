//! Generation of field lines from seed points.

use super::{FieldLine, Termination, TracePoint};
use crate::{
    error::{ParamsError, TracingError},
    field::MagneticFieldModel,
    geometry::{Point3, Vec3},
    tracing::{
        ftr,
        stepping::{
            rk4::{RK4StepperConfig, RK4StepperFactory3},
            StepperFactory3, StepperInstruction, SteppingSense,
        },
        trace_field_line,
    },
    units::Radii,
};
use std::collections::VecDeque;
use tracing::debug;

/// Parameters controlling how field lines are generated.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldLineParams {
    /// Radial distance below which tracing terminates.
    pub inner_limit: Radii<ftr>,
    /// Radial distance above which tracing terminates.
    pub outer_limit: Radii<ftr>,
    /// Smallest accepted dot product between the unit field directions at the
    /// start and end of a step.
    pub min_step_dot_field: ftr,
    /// Factor to shrink the step size by after a rejected step.
    pub fail_ratio: ftr,
    /// Largest (and initial) step size.
    pub max_step_size: Radii<ftr>,
    /// Smallest step size. A step rejected at this size means the field line
    /// bifurcates.
    pub min_step_size: Radii<ftr>,
    /// Maximum number of accepted steps for both senses combined.
    pub max_step_count: usize,
}

impl FieldLineParams {
    pub const DEFAULT_INNER_LIMIT: ftr = 1.05;
    pub const DEFAULT_OUTER_LIMIT: ftr = 15.0;
    pub const DEFAULT_MIN_STEP_DOT_FIELD: ftr = 0.01;
    pub const DEFAULT_FAIL_RATIO: ftr = 2.0;
    pub const DEFAULT_MAX_STEP_SIZE: ftr = 0.01;
    pub const DEFAULT_MIN_STEP_SIZE: ftr = 1e-6;
    pub const DEFAULT_MAX_STEP_COUNT: usize = 10000;

    /// Checks that the parameters are consistent.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let inner = self.inner_limit.value();
        let outer = self.outer_limit.value();
        if !(inner.is_finite() && inner > 0.0) {
            return Err(ParamsError::InnerLimit(inner));
        }
        if !(outer.is_finite() && outer > inner) {
            return Err(ParamsError::OuterLimit { inner, outer });
        }
        if !(self.fail_ratio.is_finite() && self.fail_ratio > 1.0) {
            return Err(ParamsError::FailRatio(self.fail_ratio));
        }
        let max = self.max_step_size.value();
        let min = self.min_step_size.value();
        if !(max.is_finite() && max > 0.0) {
            return Err(ParamsError::MaxStepSize(max));
        }
        if !(min > 0.0 && min <= max) {
            return Err(ParamsError::MinStepSize { min, max });
        }
        if !(self.min_step_dot_field.is_finite() && self.min_step_dot_field <= 1.0) {
            return Err(ParamsError::MinStepDotField(self.min_step_dot_field));
        }
        if self.max_step_count == 0 {
            return Err(ParamsError::MaxStepCount);
        }
        Ok(())
    }

    /// Creates the configuration for the steppers used to trace field lines.
    pub fn stepper_config(&self) -> RK4StepperConfig {
        RK4StepperConfig {
            min_step_dot_field: self.min_step_dot_field,
            fail_ratio: self.fail_ratio,
            max_step_size: self.max_step_size.value(),
            min_step_size: self.min_step_size.value(),
        }
    }

    /// Determines which boundary, if any, the given position lies beyond.
    pub fn boundary_crossed_at(&self, position: &Point3<ftr>) -> Option<Termination> {
        let distance = position.distance_from_origin();
        if distance < self.inner_limit.value() {
            Some(Termination::InnerBoundary)
        } else if distance > self.outer_limit.value() {
            Some(Termination::OuterBoundary)
        } else {
            None
        }
    }
}

impl Default for FieldLineParams {
    fn default() -> Self {
        Self {
            inner_limit: Radii::new(Self::DEFAULT_INNER_LIMIT),
            outer_limit: Radii::new(Self::DEFAULT_OUTER_LIMIT),
            min_step_dot_field: Self::DEFAULT_MIN_STEP_DOT_FIELD,
            fail_ratio: Self::DEFAULT_FAIL_RATIO,
            max_step_size: Radii::new(Self::DEFAULT_MAX_STEP_SIZE),
            min_step_size: Radii::new(Self::DEFAULT_MIN_STEP_SIZE),
            max_step_count: Self::DEFAULT_MAX_STEP_COUNT,
        }
    }
}

/// Traces field lines through a magnetic field model.
///
/// A generator holds no mutable state, so the same generator can be shared
/// between threads generating field lines from different seeds.
#[derive(Clone, Debug)]
pub struct FieldLineGenerator<M> {
    model: M,
    params: FieldLineParams,
    stepper_factory: RK4StepperFactory3,
}

impl<M: MagneticFieldModel> FieldLineGenerator<M> {
    /// Creates a new generator for the given model, after validating the parameters.
    pub fn new(model: M, params: FieldLineParams) -> Result<Self, ParamsError> {
        params.validate()?;
        let stepper_factory = RK4StepperFactory3::new(params.stepper_config());
        Ok(Self {
            model,
            params,
            stepper_factory,
        })
    }

    /// Returns a reference to the magnetic field model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns a reference to the generation parameters.
    pub fn params(&self) -> &FieldLineParams {
        &self.params
    }

    /// Traces the field line passing through the given seed point.
    ///
    /// The field line is first traced opposite to the field and then along
    /// it, with a fresh step size for each sense. Each sense stops when the
    /// next step would leave the shell between the inner and outer limits,
    /// or when the accepted steps of both senses together reach the maximum
    /// step count.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the traced `FieldLine`, whose seed point is the given seed.
    /// - `Err`: Contains a `TracingError` if the field line bifurcates.
    pub fn generate_field_line(&self, seed: &Point3<ftr>) -> Result<FieldLine, TracingError> {
        let max_step_count = self.params.max_step_count;
        let mut n_steps = 0;

        let mut backward_points: VecDeque<TracePoint> = VecDeque::new();
        let mut backward_termination = Termination::StepLimit;
        {
            let mut callback = |position: &Point3<ftr>, field: &Vec3<ftr>, _: ftr| {
                self.record_point(
                    &mut backward_points,
                    &mut backward_termination,
                    &mut n_steps,
                    max_step_count,
                    |points, point| points.push_front(point),
                    position,
                    field,
                )
            };
            trace_field_line(
                &self.model,
                self.stepper_factory.produce(),
                seed,
                SteppingSense::Opposite,
                &mut callback,
            )?;
        }

        let mut forward_points: Vec<TracePoint> = Vec::new();
        let mut forward_termination = Termination::StepLimit;
        {
            let mut callback = |position: &Point3<ftr>, field: &Vec3<ftr>, _: ftr| {
                self.record_point(
                    &mut forward_points,
                    &mut forward_termination,
                    &mut n_steps,
                    max_step_count,
                    |points, point| points.push(point),
                    position,
                    field,
                )
            };
            trace_field_line(
                &self.model,
                self.stepper_factory.produce(),
                seed,
                SteppingSense::Same,
                &mut callback,
            )?;
        }

        let seed_index = backward_points.len();
        let mut points = Vec::from(backward_points);
        points.reserve(1 + forward_points.len());
        points.push(TracePoint::new(*seed, self.model.field(seed)));
        points.extend(forward_points);

        debug!(
            "Traced field line from {} with {} points (ends: {}, {})",
            seed,
            points.len(),
            backward_termination,
            forward_termination
        );

        Ok(FieldLine::new(
            points,
            seed_index,
            [backward_termination, forward_termination],
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn record_point<P, A>(
        &self,
        points: &mut P,
        termination: &mut Termination,
        n_steps: &mut usize,
        max_step_count: usize,
        add_point: A,
        position: &Point3<ftr>,
        field: &Vec3<ftr>,
    ) -> StepperInstruction
    where
        A: Fn(&mut P, TracePoint),
    {
        if *n_steps >= max_step_count {
            *termination = Termination::StepLimit;
            return StepperInstruction::Terminate;
        }
        if let Some(boundary) = self.params.boundary_crossed_at(position) {
            *termination = boundary;
            return StepperInstruction::Terminate;
        }
        add_point(points, TracePoint::new(*position, *field));
        *n_steps += 1;
        StepperInstruction::Continue
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        field::{dipole::DipoleFieldModel, UniformFieldModel},
        geometry::Dim3::{X, Y, Z},
    };
    use approx::assert_relative_eq;

    #[test]
    fn default_params_are_valid() {
        assert_eq!(FieldLineParams::default().validate(), Ok(()));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = FieldLineParams {
            inner_limit: Radii::new(2.0),
            outer_limit: Radii::new(1.5),
            ..FieldLineParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamsError::OuterLimit {
                inner: 2.0,
                outer: 1.5
            })
        );

        let params = FieldLineParams {
            fail_ratio: 1.0,
            ..FieldLineParams::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::FailRatio(1.0)));

        let params = FieldLineParams {
            min_step_size: Radii::new(0.1),
            ..FieldLineParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::MinStepSize { .. })
        ));

        let params = FieldLineParams {
            max_step_count: 0,
            ..FieldLineParams::default()
        };
        assert!(FieldLineGenerator::new(DipoleFieldModel::default(), params).is_err());
    }

    #[test]
    fn dipole_field_line_is_closed_and_symmetric() {
        let generator =
            FieldLineGenerator::new(DipoleFieldModel::default(), FieldLineParams::default())
                .unwrap();
        let field_line = generator
            .generate_field_line(&Point3::new(3.0, 0.0, 0.0))
            .unwrap();

        assert!(field_line.is_closed());
        let points = field_line.points();
        let n = points.len();
        assert_eq!(field_line.seed_index(), n / 2);
        assert_eq!(points[0].position()[Z], -points[n - 1].position()[Z]);
        assert_eq!(points[0].position()[X], points[n - 1].position()[X]);
        assert!(points[0].position()[Z] < 0.0);
        for point in points {
            assert_eq!(point.position()[Y], 0.0);
        }
    }

    #[test]
    fn step_limit_is_shared_between_senses() {
        let params = FieldLineParams {
            max_step_count: 7,
            ..FieldLineParams::default()
        };
        let generator = FieldLineGenerator::new(DipoleFieldModel::default(), params).unwrap();
        let field_line = generator
            .generate_field_line(&Point3::new(3.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(field_line.number_of_points(), 8);
        assert_eq!(field_line.seed_index(), 7);
        assert_eq!(
            field_line.terminations(),
            [Termination::StepLimit, Termination::StepLimit]
        );
    }

    #[test]
    fn field_line_in_uniform_field_reaches_outer_boundary() {
        let params = FieldLineParams {
            outer_limit: Radii::new(3.0),
            max_step_size: Radii::new(0.1),
            ..FieldLineParams::default()
        };
        let generator =
            FieldLineGenerator::new(UniformFieldModel::new(Vec3::new(1.0, 0.0, 0.0)), params)
                .unwrap();
        let field_line = generator
            .generate_field_line(&Point3::new(0.0, 2.0, 0.0))
            .unwrap();
        assert_eq!(
            field_line.terminations(),
            [Termination::OuterBoundary, Termination::OuterBoundary]
        );
        for point in field_line.points() {
            assert!(point.radial_distance().value() <= 3.0);
        }
        assert_relative_eq!(
            field_line.points()[0].position()[X],
            -field_line.points()[field_line.number_of_points() - 1].position()[X],
            epsilon = 1e-12
        );
    }

    #[test]
    fn seed_at_null_field_bifurcates() {
        let generator = FieldLineGenerator::new(
            UniformFieldModel::new(Vec3::zero()),
            FieldLineParams::default(),
        )
        .unwrap();
        assert!(matches!(
            generator.generate_field_line(&Point3::new(2.0, 0.0, 0.0)),
            Err(TracingError::BifurcatingFieldLine { .. })
        ));
    }
}
