//! Stepping along field lines of a magnetic field model.

pub mod rk4;

use super::ftr;
use crate::{
    field::MagneticFieldModel,
    geometry::{Point3, Vec3},
};

/// Stepping along the field line in the same direction as the field or opposite.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum SteppingSense {
    Same,
    Opposite,
}

/// A stepper result which is either OK (with an an abitrary value) or stopped (with a cause).
#[derive(Clone, Debug)]
pub enum StepperResult<T> {
    Ok(T),
    Stopped(StoppingCause),
}

/// Reason for terminating stepping.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum StoppingCause {
    /// The field is zero or not finite, so it has no direction.
    Null,
    /// The field direction could not be stabilized at the smallest step size.
    /// Holds the dot product between the directions at the start and end of
    /// the last rejected step.
    Bifurcation(ftr),
    StoppedByCallback,
}

/// Lets the stepper callback communicate whether tracing should
/// continue or terminate.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum StepperInstruction {
    Continue,
    Terminate,
}

/// Defines the properties of a stepping scheme.
pub trait Stepper3 {
    /// Places the stepper at the given position in the field.
    ///
    /// # Parameters
    ///
    /// - `model`: Magnetic field model to step in.
    /// - `sense`: Whether to step along or opposite to the field.
    /// - `position`: Position where the stepper should be placed.
    ///
    /// # Returns
    ///
    /// A `StepperResult<()>` which is either:
    ///
    /// - `Ok`: Stepper placement succeeded.
    /// - `Stopped`: Contains a `StoppingCause` indicating why stepper placement failed.
    ///
    /// # Type parameters
    ///
    /// - `M`: Type of magnetic field model.
    fn place<M>(
        &mut self,
        model: &M,
        sense: SteppingSense,
        position: &Point3<ftr>,
    ) -> StepperResult<()>
    where
        M: MagneticFieldModel + ?Sized;

    /// Performs a step.
    ///
    /// # Parameters
    ///
    /// - `model`: Magnetic field model to step in.
    /// - `sense`: Whether to step along or opposite to the field.
    /// - `callback`: Closure that will be called with the new position, the field
    ///   vector there and the traced distance if the step succeeded.
    ///
    /// # Returns
    ///
    /// A `StepperResult<()>` which is either:
    ///
    /// - `Ok`: The step succeeded.
    /// - `Stopped`: Contains a `StoppingCause` indicating why the step failed.
    ///
    /// # Type parameters
    ///
    /// - `M`: Type of magnetic field model.
    /// - `C`: Mutable function type taking a position, a field vector and a distance, and returning a `StepperInstruction`.
    fn step<M, C>(&mut self, model: &M, sense: SteppingSense, callback: &mut C) -> StepperResult<()>
    where
        M: MagneticFieldModel + ?Sized,
        C: FnMut(&Point3<ftr>, &Vec3<ftr>, ftr) -> StepperInstruction;

    /// Returns a reference to the current stepper position.
    fn position(&self) -> &Point3<ftr>;

    /// Returns a reference to the field vector at the current stepper position.
    fn field(&self) -> &Vec3<ftr>;

    /// Retuns the current distance of the stepper along the field line.
    fn distance(&self) -> ftr;

    /// Returns the step size that will be attempted in the next step.
    fn step_size(&self) -> ftr;
}

/// Defines the properties of a 3D stepper factory structure.
pub trait StepperFactory3 {
    type Output: Stepper3;
    fn produce(&self) -> Self::Output;
}

/// Evaluates the field at the given position and computes the unit stepping
/// direction for the given sense.
///
/// Returns `None` if the field has no well-defined direction.
pub fn compute_direction<M>(
    model: &M,
    sense: SteppingSense,
    position: &Point3<ftr>,
) -> Option<(Vec3<ftr>, Vec3<ftr>)>
where
    M: MagneticFieldModel + ?Sized,
{
    let field = model.field(position);
    if field.is_zero() || !field.is_finite() {
        return None;
    }
    let mut direction = field.normalized();
    if sense == SteppingSense::Opposite {
        direction.reverse();
    }
    Some((field, direction))
}
