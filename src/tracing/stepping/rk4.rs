//! Stepping with the classical fourth-order Runge–Kutta method,
//! with step size adaptation driven by the change in field direction
//! over each step.

use super::{
    compute_direction, Stepper3, StepperFactory3, StepperInstruction, StepperResult,
    SteppingSense, StoppingCause,
};
use crate::{
    field::MagneticFieldModel,
    geometry::{Point3, Vec3},
    tracing::ftr,
};
use tracing::trace;

/// Configuration parameters for RK4 steppers.
#[derive(Clone, Debug, PartialEq)]
pub struct RK4StepperConfig {
    /// Smallest accepted dot product between the unit field directions at the
    /// start and end of a step.
    pub min_step_dot_field: ftr,
    /// Factor to divide the step size by after a rejected step, and to
    /// multiply it by after an accepted one.
    pub fail_ratio: ftr,
    /// Largest allowed step size (also the initial step size).
    pub max_step_size: ftr,
    /// Smallest allowed step size.
    pub min_step_size: ftr,
}

/// A stepper using the classical fourth-order Runge–Kutta scheme on the unit
/// field direction.
#[derive(Clone, Debug)]
pub struct RK4Stepper3 {
    config: RK4StepperConfig,
    position: Point3<ftr>,
    field: Vec3<ftr>,
    direction: Vec3<ftr>,
    distance: ftr,
    step_size: ftr,
    n_rejected_steps: usize,
}

/// Factory structure for producing RK4 steppers.
#[derive(Clone, Debug)]
pub struct RK4StepperFactory3 {
    config: RK4StepperConfig,
}

#[derive(Clone, Debug)]
struct StepAttempt3 {
    next_position: Point3<ftr>,
    next_field: Vec3<ftr>,
    next_direction: Vec3<ftr>,
    step_length: ftr,
    dot_product: ftr,
}

impl RK4Stepper3 {
    /// Creates a new RK4 stepper with the given configuration.
    pub fn new(config: RK4StepperConfig) -> Self {
        let step_size = config.max_step_size;
        RK4Stepper3 {
            config,
            position: Point3::origin(),
            field: Vec3::zero(),
            direction: Vec3::zero(),
            distance: 0.0,
            step_size,
            n_rejected_steps: 0,
        }
    }

    /// Returns the number of step attempts rejected since the stepper was placed.
    pub fn n_rejected_steps(&self) -> usize {
        self.n_rejected_steps
    }

    fn attempt_step<M>(&self, model: &M, sense: SteppingSense) -> Option<StepAttempt3>
    where
        M: MagneticFieldModel + ?Sized,
    {
        let step_size = self.step_size;
        let half_step_size = 0.5 * step_size;

        let k1 = &self.direction;
        let (_, k2) = compute_direction(model, sense, &(&self.position + &(k1 * half_step_size)))?;
        let (_, k3) = compute_direction(model, sense, &(&self.position + &(&k2 * half_step_size)))?;
        let (_, k4) = compute_direction(model, sense, &(&self.position + &(&k3 * step_size)))?;

        let displacement = (k1 + &((k2 + k3) * 2.0) + k4) * (step_size / 6.0);
        let step_length = displacement.length();
        if !(step_length > 0.0) {
            return None;
        }
        let next_position = &self.position + &displacement;
        let (next_field, next_direction) = compute_direction(model, sense, &next_position)?;

        // The stages may cancel across a field reversal, so every sampled
        // direction must agree with the starting one
        let dot_product = [&k2, &k3, &k4, &next_direction]
            .iter()
            .map(|direction| k1.dot(direction))
            .fold(ftr::INFINITY, ftr::min);

        Some(StepAttempt3 {
            next_position,
            next_field,
            next_direction,
            step_length,
            dot_product,
        })
    }

    fn apply_step_attempt(&mut self, attempt: StepAttempt3) {
        self.distance += attempt.step_length;
        self.position = attempt.next_position;
        self.field = attempt.next_field;
        self.direction = attempt.next_direction;
        self.step_size = ftr::min(
            self.step_size * self.config.fail_ratio,
            self.config.max_step_size,
        );
    }
}

impl Stepper3 for RK4Stepper3 {
    fn place<M>(
        &mut self,
        model: &M,
        sense: SteppingSense,
        position: &Point3<ftr>,
    ) -> StepperResult<()>
    where
        M: MagneticFieldModel + ?Sized,
    {
        match compute_direction(model, sense, position) {
            Some((field, direction)) => {
                self.position = *position;
                self.field = field;
                self.direction = direction;
                self.distance = 0.0;
                self.step_size = self.config.max_step_size;
                self.n_rejected_steps = 0;
                StepperResult::Ok(())
            }
            None => StepperResult::Stopped(StoppingCause::Null),
        }
    }

    fn step<M, C>(&mut self, model: &M, sense: SteppingSense, callback: &mut C) -> StepperResult<()>
    where
        M: MagneticFieldModel + ?Sized,
        C: FnMut(&Point3<ftr>, &Vec3<ftr>, ftr) -> StepperInstruction,
    {
        loop {
            let attempt = self.attempt_step(model, sense);
            let dot_product = attempt
                .as_ref()
                .map_or(ftr::NAN, |attempt| attempt.dot_product);

            // Written so that a NaN dot product counts as a rejection
            if let (Some(attempt), true) = (attempt, dot_product >= self.config.min_step_dot_field) {
                self.apply_step_attempt(attempt);
                break;
            }

            self.n_rejected_steps += 1;
            if self.step_size <= self.config.min_step_size {
                return StepperResult::Stopped(StoppingCause::Bifurcation(dot_product));
            }
            self.step_size = ftr::max(
                self.step_size / self.config.fail_ratio,
                self.config.min_step_size,
            );
            trace!(
                "Rejected step at {} (dot product {}), retrying with step size {}",
                self.position,
                dot_product,
                self.step_size
            );
        }

        match callback(&self.position, &self.field, self.distance) {
            StepperInstruction::Continue => StepperResult::Ok(()),
            StepperInstruction::Terminate => {
                StepperResult::Stopped(StoppingCause::StoppedByCallback)
            }
        }
    }

    fn position(&self) -> &Point3<ftr> {
        &self.position
    }

    fn field(&self) -> &Vec3<ftr> {
        &self.field
    }

    fn distance(&self) -> ftr {
        self.distance
    }

    fn step_size(&self) -> ftr {
        self.step_size
    }
}

impl RK4StepperFactory3 {
    /// Creates a new factory producing RK4 steppers with the given configuration.
    pub fn new(config: RK4StepperConfig) -> Self {
        RK4StepperFactory3 { config }
    }
}

impl StepperFactory3 for RK4StepperFactory3 {
    type Output = RK4Stepper3;
    fn produce(&self) -> Self::Output {
        RK4Stepper3::new(self.config.clone())
    }
}
