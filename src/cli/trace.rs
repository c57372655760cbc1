//! Command line interface for tracing field lines and computing longitudinal invariants.

use crate::{
    cli::{
        seeding::{
            equatorial::{
                create_equatorial_seeder_from_arguments, create_equatorial_seeder_subcommand,
            },
            manual::{create_manual_seeder_from_arguments, create_manual_seeder_subcommand},
        },
        utils as cli_utils,
    },
    exit_on_error, exit_on_false,
    field::{
        dipole::DipoleFieldModel, DynMagneticFieldModel, MagneticFieldModel, UniformFieldModel,
    },
    geometry::{Point3, Vec3},
    io::{utils as io_utils, Verbosity},
    seeding::Seeder3,
    tracing::{
        field_line::{
            generator::{FieldLineGenerator, FieldLineParams},
            FieldLine, Termination, TracePoint,
        },
        ftr,
    },
    units::{NanoTesla, Radii},
};
use clap::{Arg, ArgMatches, Command, ValueHint};
use std::{
    fmt,
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use tracing::{debug, warn};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Builds a representation of the `trace` command line subcommand.
pub fn create_trace_subcommand() -> Command<'static> {
    Command::new("trace")
        .about("Trace field lines of a dipole field and compute longitudinal invariants")
        .after_help(
            "Specify the source of seed points with a subcommand. For each seed, the field\n\
             line is traced in both directions until it leaves the shell between the inner\n\
             and outer limits. Field lines that bifurcate, are too short or do not return to\n\
             the planet at both ends are skipped.",
        )
        .arg(
            Arg::new("output-file")
                .short('o')
                .long("output-file")
                .require_equals(true)
                .value_name("FILE")
                .help("Path of the file where the results should be written [default: stdout]")
                .takes_value(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .require_equals(true)
                .value_name("FORMAT")
                .help("Format of the written results")
                .takes_value(true)
                .possible_values(OutputFormat::NAMES.iter().copied())
                .default_value("text"),
        )
        .arg(
            Arg::new("minimum")
                .long("minimum")
                .help("Write the point with the smallest longitudinal invariant of each field line")
                .conflicts_with("k"),
        )
        .arg(
            Arg::new("k")
                .long("k")
                .require_equals(true)
                .value_name("VALUE")
                .help(
                    "Write the two points with this longitudinal invariant of each field line\n\
                     [sqrt(nT) planetary radii]",
                )
                .takes_value(true)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("min-points")
                .long("min-points")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Skip field lines with fewer points than this")
                .takes_value(true)
                .default_value("100"),
        )
        .arg(
            Arg::new("max-end-distance")
                .long("max-end-distance")
                .require_equals(true)
                .value_name("VALUE")
                .help(
                    "Skip field lines with an end further than this from the planet centre\n\
                     [planetary radii]",
                )
                .takes_value(true)
                .default_value("1.1"),
        )
        .arg(
            Arg::new("dipole-field")
                .long("dipole-field")
                .require_equals(true)
                .value_name("VALUE")
                .help("Dipole field strength at the equatorial surface [nT]")
                .takes_value(true)
                .default_value("30000.0"),
        )
        .arg(
            Arg::new("uniform-field")
                .long("uniform-field")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["BX", "BY", "BZ"])
                .help("Uniform field to add to the dipole field [nT]")
                .takes_value(true)
                .number_of_values(3),
        )
        .arg(
            Arg::new("inner-limit")
                .long("inner-limit")
                .require_equals(true)
                .value_name("VALUE")
                .help("Terminate tracing below this radial distance [planetary radii] [default: 1.05]")
                .takes_value(true),
        )
        .arg(
            Arg::new("outer-limit")
                .long("outer-limit")
                .require_equals(true)
                .value_name("VALUE")
                .help("Terminate tracing above this radial distance [planetary radii] [default: 15.0]")
                .takes_value(true),
        )
        .arg(
            Arg::new("min-step-dot-field")
                .long("min-step-dot-field")
                .require_equals(true)
                .value_name("VALUE")
                .help(
                    "Smallest accepted dot product of the field directions at the start and end\n\
                     of a step [default: 0.01]",
                )
                .takes_value(true)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("fail-ratio")
                .long("fail-ratio")
                .require_equals(true)
                .value_name("VALUE")
                .help("Factor to shrink the step size by after a rejected step [default: 2.0]")
                .takes_value(true),
        )
        .arg(
            Arg::new("max-step-size")
                .long("max-step-size")
                .require_equals(true)
                .value_name("VALUE")
                .help("Largest and initial step size [planetary radii] [default: 0.01]")
                .takes_value(true),
        )
        .arg(
            Arg::new("min-step-size")
                .long("min-step-size")
                .require_equals(true)
                .value_name("VALUE")
                .help("Smallest step size [planetary radii] [default: 1e-6]")
                .takes_value(true),
        )
        .arg(
            Arg::new("max-step-count")
                .long("max-step-count")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Maximum number of steps for each field line [default: 10000]")
                .takes_value(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print status messages while tracing field lines"),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show progress bar for tracing (also implies `verbose`)"),
        )
        .subcommand_required(true)
        .subcommand(create_equatorial_seeder_subcommand())
        .subcommand(create_manual_seeder_subcommand())
}

/// Runs the actions for the `trace` subcommand using the given arguments.
pub fn run_trace_subcommand(arguments: &ArgMatches) {
    let verbosity = cli_utils::parse_verbosity(arguments, true);
    let params = construct_field_line_params_from_options(arguments);
    let model = construct_field_model_from_options(arguments);
    let generator = exit_on_error!(
        FieldLineGenerator::new(model, params),
        "Error: Invalid field line parameters: {}"
    );
    let selection = FieldLineSelection::from_arguments(arguments);
    let output_mode = OutputMode::from_arguments(arguments);
    let output_format = OutputFormat::from_arguments(arguments);

    let mut writer: Box<dyn Write> = match arguments.value_of("output-file") {
        Some(output_file_path) => Box::new(BufWriter::new(exit_on_error!(
            io_utils::create_file_and_map_err(&PathBuf::from(output_file_path)),
            "Error: {}"
        ))),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let statistics = if let Some(seeder_arguments) = arguments.subcommand_matches("equatorial") {
        trace_from_seeder(
            create_equatorial_seeder_from_arguments(seeder_arguments),
            &generator,
            &selection,
            output_mode,
            output_format,
            &mut writer,
            &verbosity,
        )
    } else if let Some(seeder_arguments) = arguments.subcommand_matches("manual") {
        trace_from_seeder(
            create_manual_seeder_from_arguments(seeder_arguments),
            &generator,
            &selection,
            output_mode,
            output_format,
            &mut writer,
            &verbosity,
        )
    } else {
        unreachable!("No seeder subcommand")
    };
    let statistics = exit_on_error!(statistics, "Error: Could not write results: {}");
    exit_on_error!(writer.flush(), "Error: Could not write results: {}");

    if verbosity.print_messages() {
        eprintln!("{}", statistics);
    }
}

/// Creates field line parameters from the defaults and any given options.
pub fn construct_field_line_params_from_options(arguments: &ArgMatches) -> FieldLineParams {
    let mut params = FieldLineParams::default();
    if let Some(value) = get_finite_float_option(arguments, "inner-limit") {
        params.inner_limit = Radii::new(value);
    }
    if let Some(value) = get_finite_float_option(arguments, "outer-limit") {
        params.outer_limit = Radii::new(value);
    }
    if let Some(value) = get_finite_float_option(arguments, "min-step-dot-field") {
        params.min_step_dot_field = value;
    }
    if let Some(value) = get_finite_float_option(arguments, "fail-ratio") {
        params.fail_ratio = value;
    }
    if let Some(value) = get_finite_float_option(arguments, "max-step-size") {
        params.max_step_size = Radii::new(value);
    }
    if let Some(value) = get_finite_float_option(arguments, "min-step-size") {
        params.min_step_size = Radii::new(value);
    }
    if let Some(value) = cli_utils::get_value_from_parseable_argument(arguments, "max-step-count") {
        params.max_step_count = value;
    }
    params
}

/// Creates the magnetic field model described by the given options.
pub fn construct_field_model_from_options(arguments: &ArgMatches) -> DynMagneticFieldModel {
    let dipole_field: ftr =
        cli_utils::get_finite_float_value_from_required_parseable_argument(arguments, "dipole-field");
    let dipole = DipoleFieldModel::new(NanoTesla::new(dipole_field));
    match cli_utils::parse_3d_float_values::<ftr>(arguments, "uniform-field") {
        Some(uniform_field) => {
            Box::new(dipole.summed_with(UniformFieldModel::new(Vec3::from_in3d(uniform_field))))
        }
        None => Box::new(dipole),
    }
}

fn get_finite_float_option(arguments: &ArgMatches, argument_name: &str) -> Option<ftr> {
    let value: Option<ftr> = cli_utils::get_value_from_parseable_argument(arguments, argument_name);
    if let Some(value) = value {
        exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
    }
    value
}

/// Criteria a traced field line must meet to be included in the output.
#[derive(Clone, Debug)]
struct FieldLineSelection {
    min_points: usize,
    max_end_distance: ftr,
}

impl FieldLineSelection {
    fn from_arguments(arguments: &ArgMatches) -> Self {
        Self {
            min_points: cli_utils::get_value_from_required_parseable_argument(
                arguments,
                "min-points",
            ),
            max_end_distance: cli_utils::get_finite_float_value_from_required_parseable_argument(
                arguments,
                "max-end-distance",
            ),
        }
    }

    fn accepts(&self, field_line: &FieldLine) -> bool {
        let points = field_line.points();
        field_line.number_of_points() >= self.min_points
            && [points.first(), points.last()].iter().all(|end| {
                end.map_or(false, |point| {
                    point.radial_distance().value() <= self.max_end_distance
                })
            })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum OutputMode {
    Summary,
    Minimum,
    PointsWithInvariant(ftr),
}

impl OutputMode {
    fn from_arguments(arguments: &ArgMatches) -> Self {
        if arguments.is_present("minimum") {
            Self::Minimum
        } else if let Some(target) = get_finite_float_option(arguments, "k") {
            Self::PointsWithInvariant(target)
        } else {
            Self::Summary
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum OutputFormat {
    Text,
    #[cfg(feature = "json")]
    Json,
}

impl OutputFormat {
    #[cfg(feature = "json")]
    const NAMES: &'static [&'static str] = &["text", "json"];
    #[cfg(not(feature = "json"))]
    const NAMES: &'static [&'static str] = &["text"];

    fn from_arguments(arguments: &ArgMatches) -> Self {
        cli_utils::get_value_from_required_constrained_argument(
            arguments,
            "format",
            Self::NAMES,
            &[
                Self::Text,
                #[cfg(feature = "json")]
                Self::Json,
            ],
        )
    }
}

/// Condensed description of an accepted field line.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
struct FieldLineSummary {
    seed: Point3<ftr>,
    number_of_points: usize,
    length: Radii<ftr>,
    max_longitudinal_invariant: ftr,
    terminations: [Termination; 2],
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(Serialize), serde(untagged))]
enum FieldLineRecord {
    Summary(FieldLineSummary),
    Minimum(TracePoint),
    PointsWithInvariant([TracePoint; 2]),
}

impl fmt::Display for FieldLineSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "seed {}: {} points, length {}, max K {} (ends: {}, {})",
            self.seed,
            self.number_of_points,
            self.length,
            self.max_longitudinal_invariant,
            self.terminations[0],
            self.terminations[1]
        )
    }
}

impl fmt::Display for FieldLineRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Summary(summary) => write!(f, "{}", summary),
            Self::Minimum(point) => write!(f, "{}", point),
            Self::PointsWithInvariant([start, finish]) => write!(f, "{} | {}", start, finish),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct TraceStatistics {
    n_seeds: usize,
    n_bifurcating: usize,
    n_rejected: usize,
    n_written: usize,
}

impl fmt::Display for TraceStatistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Traced {} seeds: {} written, {} bifurcating, {} skipped",
            self.n_seeds, self.n_written, self.n_bifurcating, self.n_rejected
        )
    }
}

fn trace_from_seeder<S, M, W>(
    seeder: S,
    generator: &FieldLineGenerator<M>,
    selection: &FieldLineSelection,
    output_mode: OutputMode,
    output_format: OutputFormat,
    writer: &mut W,
    verbosity: &Verbosity,
) -> io::Result<TraceStatistics>
where
    S: Seeder3,
    M: MagneticFieldModel,
    W: Write + ?Sized,
{
    let n_seeds = seeder.number_of_points();
    if verbosity.print_messages() {
        eprintln!("Tracing field lines from {} seeds", n_seeds);
    }
    let progress_bar = verbosity.create_progress_bar(n_seeds);

    let mut statistics = TraceStatistics {
        n_seeds,
        ..TraceStatistics::default()
    };

    for seed in seeder {
        progress_bar.inc(1);
        let mut field_line = match generator.generate_field_line(&seed) {
            Ok(field_line) => field_line,
            Err(err) => {
                warn!("Skipping seed {}: {}", seed, err);
                statistics.n_bifurcating += 1;
                continue;
            }
        };
        if !selection.accepts(&field_line) {
            debug!(
                "Skipping field line from {} with {} points",
                seed,
                field_line.number_of_points()
            );
            statistics.n_rejected += 1;
            continue;
        }
        field_line.calculate_longitudinal_invariants();

        match create_record(&seed, &field_line, output_mode) {
            Some(record) => {
                write_record(writer, output_format, &record)?;
                statistics.n_written += 1;
            }
            None => statistics.n_rejected += 1,
        }
    }
    progress_bar.finish_and_clear();

    Ok(statistics)
}

fn create_record(
    seed: &Point3<ftr>,
    field_line: &FieldLine,
    output_mode: OutputMode,
) -> Option<FieldLineRecord> {
    let max_longitudinal_invariant = match field_line.max_longitudinal_invariant() {
        Ok(max_longitudinal_invariant) => max_longitudinal_invariant,
        Err(err) => {
            debug!("Skipping field line from {}: {}", seed, err);
            return None;
        }
    };
    match output_mode {
        OutputMode::Summary => Some(FieldLineRecord::Summary(FieldLineSummary {
            seed: *seed,
            number_of_points: field_line.number_of_points(),
            length: field_line.length(),
            max_longitudinal_invariant,
            terminations: field_line.terminations(),
        })),
        OutputMode::Minimum => match field_line.minimum_invariant_point() {
            Ok(point) => Some(FieldLineRecord::Minimum(point.clone())),
            Err(err) => {
                debug!("Skipping field line from {}: {}", seed, err);
                None
            }
        },
        OutputMode::PointsWithInvariant(target) => {
            if max_longitudinal_invariant < target {
                return None;
            }
            match field_line.points_with_invariant(target) {
                Ok(points) => Some(FieldLineRecord::PointsWithInvariant(points)),
                Err(err) => {
                    debug!("Skipping field line from {}: {}", seed, err);
                    None
                }
            }
        }
    }
}

fn write_record<W: Write + ?Sized>(
    writer: &mut W,
    output_format: OutputFormat,
    record: &FieldLineRecord,
) -> io::Result<()> {
    match output_format {
        OutputFormat::Text => writeln!(writer, "{}", record),
        #[cfg(feature = "json")]
        OutputFormat::Json => {
            io_utils::write_data_as_json(&mut *writer, record)?;
            writeln!(writer)
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cli::build;

    fn trace_arguments(args: &[&str]) -> ArgMatches {
        let matches = build::build().get_matches_from(args.iter().copied());
        matches
            .subcommand_matches("trace")
            .expect("No trace subcommand")
            .clone()
    }

    #[test]
    fn params_options_override_defaults() {
        let arguments = trace_arguments(&[
            "ubk",
            "trace",
            "--outer-limit=8.0",
            "--max-step-count=500",
            "equatorial",
            "-n=1",
        ]);
        let params = construct_field_line_params_from_options(&arguments);
        assert_eq!(params.outer_limit, Radii::new(8.0));
        assert_eq!(params.max_step_count, 500);
        assert_eq!(params.inner_limit, FieldLineParams::default().inner_limit);
    }

    #[test]
    fn summary_records_are_written_for_closed_dipole_lines() {
        let arguments = trace_arguments(&["ubk", "trace", "equatorial", "--shape=2,3"]);
        let generator = FieldLineGenerator::new(
            construct_field_model_from_options(&arguments),
            construct_field_line_params_from_options(&arguments),
        )
        .unwrap();
        let mut output = Vec::new();
        let statistics = trace_from_seeder(
            create_equatorial_seeder_from_arguments(
                arguments.subcommand_matches("equatorial").unwrap(),
            ),
            &generator,
            &FieldLineSelection::from_arguments(&arguments),
            OutputMode::from_arguments(&arguments),
            OutputFormat::from_arguments(&arguments),
            &mut output,
            &Verbosity::Quiet,
        )
        .unwrap();

        assert_eq!(statistics.n_seeds, 6);
        assert_eq!(statistics.n_written, 6);
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().count(), 6);
        assert!(output.lines().all(|line| line.starts_with("seed")));
    }

    #[test]
    fn unannotated_field_line_gives_no_record() {
        let generator =
            FieldLineGenerator::new(DipoleFieldModel::default(), FieldLineParams::default())
                .unwrap();
        let seed = Point3::new(3.0, 0.0, 0.0);
        let field_line = generator.generate_field_line(&seed).unwrap();
        assert!(create_record(&seed, &field_line, OutputMode::Minimum).is_none());
        assert!(create_record(&seed, &field_line, OutputMode::Summary).is_none());
    }

    #[test]
    fn minimum_record_is_equatorial_point() {
        let generator =
            FieldLineGenerator::new(DipoleFieldModel::default(), FieldLineParams::default())
                .unwrap();
        let seed = Point3::new(3.0, 0.0, 0.0);
        let mut field_line = generator.generate_field_line(&seed).unwrap();
        field_line.calculate_longitudinal_invariants();
        match create_record(&seed, &field_line, OutputMode::Minimum) {
            Some(FieldLineRecord::Minimum(point)) => assert_eq!(point.position(), &seed),
            other => panic!("Unexpected record {:?}", other),
        }
    }

    #[test]
    fn lines_without_target_invariant_are_skipped() {
        let arguments = trace_arguments(&["ubk", "trace", "--k=1e9", "manual", "-i=seeds.csv"]);
        let generator =
            FieldLineGenerator::new(DipoleFieldModel::default(), FieldLineParams::default())
                .unwrap();
        let mut output = Vec::new();
        let statistics = trace_from_seeder(
            vec![Point3::new(3.0, 0.0, 0.0)],
            &generator,
            &FieldLineSelection::from_arguments(&arguments),
            OutputMode::from_arguments(&arguments),
            OutputFormat::Text,
            &mut output,
            &Verbosity::Quiet,
        )
        .unwrap();
        assert_eq!(statistics.n_written, 0);
        assert_eq!(statistics.n_rejected, 1);
        assert!(output.is_empty());
    }
}
