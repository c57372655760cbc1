#![allow(dead_code)]

use ubk::{
    field::{dipole::DipoleFieldModel, MagneticFieldModel},
    geometry::{Point3, Vec3},
    tracing::{
        field_line::{
            generator::{FieldLineGenerator, FieldLineParams},
            FieldLine,
        },
        ftr,
    },
};

/// A field pointing along +x for `x < 4` that vanishes everywhere else.
#[derive(Clone, Debug)]
pub struct NullRegionFieldModel;

pub const NULL_REGION_BOUNDARY: ftr = 4.0;

impl MagneticFieldModel for NullRegionFieldModel {
    fn field(&self, position: &Point3<ftr>) -> Vec3<ftr> {
        if position[ubk::geometry::Dim3::X] < NULL_REGION_BOUNDARY {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::zero()
        }
    }
}

/// A field pointing along +x for `x < 4` and along -x everywhere else.
#[derive(Clone, Debug)]
pub struct ReversingFieldModel;

pub const REVERSAL_PLANE: ftr = 4.0;

impl MagneticFieldModel for ReversingFieldModel {
    fn field(&self, position: &Point3<ftr>) -> Vec3<ftr> {
        if position[ubk::geometry::Dim3::X] < REVERSAL_PLANE {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(-1.0, 0.0, 0.0)
        }
    }
}

pub fn dipole_generator() -> FieldLineGenerator<DipoleFieldModel> {
    dipole_generator_with_params(FieldLineParams::default())
}

pub fn dipole_generator_with_params(
    params: FieldLineParams,
) -> FieldLineGenerator<DipoleFieldModel> {
    match FieldLineGenerator::new(DipoleFieldModel::default(), params) {
        Ok(generator) => generator,
        Err(err) => panic!("Invalid field line parameters: {}", err),
    }
}

pub fn trace_annotated<M: MagneticFieldModel>(
    generator: &FieldLineGenerator<M>,
    seed: Point3<ftr>,
) -> FieldLine {
    let mut field_line = match generator.generate_field_line(&seed) {
        Ok(field_line) => field_line,
        Err(err) => panic!("Tracing from {} failed: {}", seed, err),
    };
    field_line.calculate_longitudinal_invariants();
    field_line
}

pub fn longitudinal_invariants(field_line: &FieldLine) -> Vec<ftr> {
    field_line
        .points()
        .iter()
        .map(|point| {
            point
                .longitudinal_invariant()
                .expect("Missing longitudinal invariant")
        })
        .collect()
}

/// Whether the values never increase before their minimum and never decrease
/// after it. Once the values have started rising, any drop, or any return
/// to the minimum, means a second valley.
pub fn has_single_minimum(values: &[ftr]) -> bool {
    let mut minimum = match values.first() {
        Some(&first) => first,
        None => return true,
    };
    let mut rising = false;
    for pair in values.windows(2) {
        let (previous, value) = (pair[0], pair[1]);
        if value > minimum && value >= previous {
            rising |= value > previous;
        } else if rising {
            return false;
        } else if value <= previous {
            minimum = value;
        } else {
            return false;
        }
    }
    true
}

pub fn assert_ends_near_planet(field_line: &FieldLine, max_end_distance: ftr) {
    let points = field_line.points();
    for end in [&points[0], &points[points.len() - 1]] {
        let distance = end.radial_distance().value();
        assert!(
            distance <= max_end_distance,
            "Field line end {} at distance {} is farther out than {}",
            end.position(),
            distance,
            max_end_distance
        );
    }
}

pub fn assert_in_meridian_plane(field_line: &FieldLine) {
    for point in field_line.points() {
        assert!(
            point.position()[ubk::geometry::Dim3::Y] == 0.0,
            "Point {} has left the y = 0 plane",
            point.position()
        );
    }
}
