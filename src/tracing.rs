//! Tracing field lines of a magnetic field model.

pub mod field_line;
pub mod stepping;

use self::stepping::{Stepper3, StepperInstruction, StepperResult, SteppingSense, StoppingCause};
use crate::{
    error::TracingError,
    field::MagneticFieldModel,
    geometry::{Point3, Vec3},
};
use tracing::debug;

/// Floating-point precision to use for tracing.
#[allow(non_camel_case_types)]
pub type ftr = f64;

/// Traces a field line through a magnetic field model in a single sense.
///
/// # Parameters
///
/// - `model`: Magnetic field model to trace.
/// - `stepper`: Stepper to use (will be consumed).
/// - `start_position`: Position where the tracing should start.
/// - `sense`: Whether the field line should be traced in the same or opposite direction as the field.
/// - `callback`: Closure that for each accepted step will be called with the new position,
///   the field vector there and the total traced distance.
///
/// # Returns
///
/// A `Result` which is either:
///
/// - `Ok`: Contains the `StoppingCause` that terminated the tracing.
/// - `Err`: Contains a `TracingError` if the field direction could not be resolved.
///
/// # Type parameters
///
/// - `M`: Type of magnetic field model.
/// - `St`: Type of stepper.
/// - `C`: Mutable function type taking a position, a field vector and a distance, and returning a `StepperInstruction`.
pub fn trace_field_line<M, St, C>(
    model: &M,
    mut stepper: St,
    start_position: &Point3<ftr>,
    sense: SteppingSense,
    callback: &mut C,
) -> Result<StoppingCause, TracingError>
where
    M: MagneticFieldModel + ?Sized,
    St: Stepper3,
    C: FnMut(&Point3<ftr>, &Vec3<ftr>, ftr) -> StepperInstruction,
{
    if let StepperResult::Stopped(cause) = stepper.place(model, sense, start_position) {
        return Err(bifurcation_error(start_position, cause));
    }
    loop {
        if let StepperResult::Stopped(cause) = stepper.step(model, sense, callback) {
            return match cause {
                StoppingCause::StoppedByCallback => Ok(cause),
                _ => Err(bifurcation_error(stepper.position(), cause)),
            };
        }
    }
}

fn bifurcation_error(position: &Point3<ftr>, cause: StoppingCause) -> TracingError {
    let dot_product = match cause {
        StoppingCause::Bifurcation(dot_product) => dot_product,
        _ => ftr::NAN,
    };
    debug!(
        "Field line bifurcates at {} (direction dot product {})",
        position, dot_product
    );
    TracingError::BifurcatingFieldLine {
        position: *position,
        dot_product,
    }
}
