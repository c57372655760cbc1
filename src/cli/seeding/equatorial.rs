//! Command line interface for producing seed points in the equatorial plane.

use crate::{
    cli::utils as cli_utils, exit_on_false, seeding::equatorial::EquatorialSeeder3, tracing::ftr,
    units::Radii,
};
use clap::{Arg, ArgMatches, Command};
use rand::{rngs::StdRng, SeedableRng};

/// Creates a subcommand for using an equatorial seeder.
pub fn create_equatorial_seeder_subcommand() -> Command<'static> {
    Command::new("equatorial")
        .about("Produce seed points in an annulus of the equatorial plane")
        .long_about(
            "Produce seed points in an annulus of the equatorial plane.\n\
             By default the points are drawn uniformly by area. With --shape the\n\
             points are instead placed on a regular polar grid.",
        )
        .arg(
            Arg::new("min-distance")
                .long("min-distance")
                .require_equals(true)
                .value_name("VALUE")
                .help("Inner radius of the annulus [planetary radii]")
                .takes_value(true)
                .default_value("2.0"),
        )
        .arg(
            Arg::new("max-distance")
                .long("max-distance")
                .require_equals(true)
                .value_name("VALUE")
                .help("Outer radius of the annulus [planetary radii]")
                .takes_value(true)
                .default_value("10.0"),
        )
        .arg(
            Arg::new("n-seeds")
                .short('n')
                .long("n-seeds")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of random seed points to produce")
                .takes_value(true)
                .required_unless_present("shape"),
        )
        .arg(
            Arg::new("rng-seed")
                .long("rng-seed")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Seed for the random number generator [default: from entropy]")
                .takes_value(true),
        )
        .arg(
            Arg::new("shape")
                .long("shape")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .value_names(&["N_RADIAL", "N_AZIMUTHAL"])
                .help("Place seed points on a regular polar grid with the given shape")
                .takes_value(true)
                .number_of_values(2)
                .conflicts_with_all(&["n-seeds", "rng-seed"]),
        )
}

/// Creates an equatorial seeder based on the provided arguments.
pub fn create_equatorial_seeder_from_arguments(arguments: &ArgMatches) -> EquatorialSeeder3 {
    let min_distance: ftr =
        cli_utils::get_finite_float_value_from_required_parseable_argument(arguments, "min-distance");
    let max_distance: ftr =
        cli_utils::get_finite_float_value_from_required_parseable_argument(arguments, "max-distance");

    exit_on_false!(
        min_distance >= 0.0,
        "Error: min-distance must be non-negative"
    );
    exit_on_false!(
        max_distance >= min_distance,
        "Error: max-distance must not be smaller than min-distance"
    );

    let (min_distance, max_distance) = (Radii::new(min_distance), Radii::new(max_distance));

    if let Some(shape) = arguments.values_of("shape") {
        let shape: Vec<usize> = shape
            .map(|value_string| cli_utils::parse_value_string("shape", value_string))
            .collect();
        exit_on_false!(
            shape.len() == 2 && shape.iter().all(|&n| n > 0),
            "Error: shape must consist of two positive values"
        );
        EquatorialSeeder3::regular(min_distance, max_distance, shape[0], shape[1])
    } else {
        let n_seeds: usize =
            cli_utils::get_value_from_required_parseable_argument(arguments, "n-seeds");
        match cli_utils::get_value_from_parseable_argument::<u64>(arguments, "rng-seed") {
            Some(rng_seed) => EquatorialSeeder3::random(
                min_distance,
                max_distance,
                n_seeds,
                &mut StdRng::seed_from_u64(rng_seed),
            ),
            None => EquatorialSeeder3::random(
                min_distance,
                max_distance,
                n_seeds,
                &mut rand::thread_rng(),
            ),
        }
    }
}
