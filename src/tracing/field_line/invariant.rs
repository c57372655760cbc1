//! Computation of the longitudinal invariant K along field lines.
//!
//! For a particle mirroring where the field strength equals `B_m`, the
//! longitudinal invariant is
//!
//! `K = ∫ sqrt(B_m - B(s)) ds`
//!
//! taken over the stretch of field line around the field strength minimum
//! where `B(s) < B_m`.

use super::FieldLine;
use crate::{num, tracing::ftr};

impl FieldLine {
    /// Calculates and stores the longitudinal invariant K for every point on
    /// the field line, taking the field strength at each point as the mirror
    /// field strength.
    ///
    /// Points at the field strength minimum get K = 0, and so do all points
    /// of a field line with fewer than two points. Calling this again
    /// recomputes the same values.
    pub fn calculate_longitudinal_invariants(&mut self) {
        let invariants =
            compute_longitudinal_invariants(&self.field_strengths(), &self.segment_lengths());
        for (point, invariant) in self.points.iter_mut().zip(invariants) {
            point.set_longitudinal_invariant(invariant);
        }
    }
}

/// Computes the longitudinal invariant for each sample of a field strength
/// profile, taking the field strength at the sample as the mirror field strength.
///
/// # Parameters
///
/// - `field_strengths`: Field strength at each point along the field line.
/// - `segment_lengths`: Distance between each pair of consecutive points.
///
/// # Returns
///
/// A `Vec<ftr>` with the longitudinal invariant for each point.
///
/// # Panics
///
/// If the number of segment lengths is not one less than the number of
/// field strengths (for non-empty profiles).
pub fn compute_longitudinal_invariants(
    field_strengths: &[ftr],
    segment_lengths: &[ftr],
) -> Vec<ftr> {
    let n_points = field_strengths.len();
    if n_points < 2 {
        return vec![0.0; n_points];
    }
    assert_eq!(
        segment_lengths.len() + 1,
        n_points,
        "Number of segment lengths must be one less than number of field strengths."
    );
    let Some((min_idx, _)) = num::index_of_min(field_strengths.iter().copied()) else {
        return vec![0.0; n_points];
    };
    field_strengths
        .iter()
        .map(|&mirror_field_strength| {
            bounce_integral(
                field_strengths,
                segment_lengths,
                min_idx,
                mirror_field_strength,
            )
        })
        .collect()
}

/// Integrates `sqrt(B_m - B)` with the trapezoidal rule between the two
/// points around `min_idx` where the profile crosses `B_m`. Crossings between
/// samples are located by linear interpolation. A side with no crossing is
/// integrated to the end of the profile.
fn bounce_integral(
    field_strengths: &[ftr],
    segment_lengths: &[ftr],
    min_idx: usize,
    mirror_field_strength: ftr,
) -> ftr {
    // Also catches a NaN mirror field strength
    if !(mirror_field_strength > field_strengths[min_idx]) {
        return 0.0;
    }
    let integrand = |idx: usize| (mirror_field_strength - field_strengths[idx]).sqrt();

    let left_crossing = field_strengths[..min_idx]
        .iter()
        .rposition(|&field_strength| field_strength >= mirror_field_strength);
    let right_crossing = field_strengths[min_idx + 1..]
        .iter()
        .position(|&field_strength| field_strength >= mirror_field_strength)
        .map(|offset| min_idx + 1 + offset);

    let mut integral = 0.0;

    let first_inside = match left_crossing {
        Some(idx) => {
            let fraction = (mirror_field_strength - field_strengths[idx + 1])
                / (field_strengths[idx] - field_strengths[idx + 1]);
            integral += trapezoid(0.0, integrand(idx + 1), fraction * segment_lengths[idx]);
            idx + 1
        }
        None => 0,
    };
    let last_inside = match right_crossing {
        Some(idx) => idx - 1,
        None => field_strengths.len() - 1,
    };

    for idx in first_inside..last_inside {
        integral += trapezoid(integrand(idx), integrand(idx + 1), segment_lengths[idx]);
    }

    if let Some(idx) = right_crossing {
        let fraction = (mirror_field_strength - field_strengths[idx - 1])
            / (field_strengths[idx] - field_strengths[idx - 1]);
        integral += trapezoid(integrand(idx - 1), 0.0, fraction * segment_lengths[idx - 1]);
    }

    integral
}

fn trapezoid(start_value: ftr, end_value: ftr, width: ftr) -> ftr {
    0.5 * (start_value + end_value) * width
}
