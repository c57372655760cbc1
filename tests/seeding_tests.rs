#![cfg(feature = "seeding")]

mod common;

use rand::{rngs::StdRng, SeedableRng};
use std::io::Write;
use tempfile::NamedTempFile;
use ubk::{
    geometry::{Dim3::Z, Point3},
    seeding::{equatorial::EquatorialSeeder3, manual::ManualSeeder3, Seeder3},
    units::Radii,
};

#[test]
fn manual_seeds_are_read_from_csv_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# Seed points [planetary radii]").unwrap();
    writeln!(file, "2.0,0.0,0.0").unwrap();
    writeln!(file, "0.0, 3.0, 0.0").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "-4.0,0.0,0.5").unwrap();
    file.flush().unwrap();

    let seeder = ManualSeeder3::new(file.path()).unwrap();
    assert_eq!(seeder.number_of_points(), 3);
    let points: Vec<_> = seeder.into_iter().collect();
    assert_eq!(points[0], Point3::new(2.0, 0.0, 0.0));
    assert_eq!(points[2], Point3::new(-4.0, 0.0, 0.5));
}

#[test]
fn missing_seed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ManualSeeder3::new(&dir.path().join("seeds.csv")).is_err());
}

#[test]
fn equatorial_seeds_trace_to_closed_field_lines() {
    let generator = common::dipole_generator();
    let mut rng = StdRng::seed_from_u64(7);
    let seeder = EquatorialSeeder3::random(Radii::new(2.0), Radii::new(6.0), 5, &mut rng);

    for seed in seeder {
        assert_eq!(seed[Z], 0.0);
        let field_line = common::trace_annotated(&generator, seed);
        assert!(field_line.is_closed());
        assert_eq!(field_line.seed_point().position(), &seed);

        let invariants = common::longitudinal_invariants(&field_line);
        assert!(common::has_single_minimum(&invariants));
    }
}

#[test]
fn retained_seeds_satisfy_predicate() {
    let mut seeder = EquatorialSeeder3::regular(Radii::new(2.0), Radii::new(12.0), 6, 8);
    assert_eq!(seeder.number_of_points(), 48);
    seeder.retain_points(|point| point.distance_from_origin() < 9.0);
    assert_eq!(seeder.number_of_points(), 32);
}
