//! Function for running the command line program.

use super::{build, trace::run_trace_subcommand};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Runs the `ubk` command line program.
pub fn run() {
    let command = build::build();

    let arguments = command.get_matches();

    let verbose = arguments
        .subcommand_matches("trace")
        .map_or(false, |trace_arguments| {
            trace_arguments.is_present("verbose") || trace_arguments.is_present("progress")
        });
    initialize_logging(verbose);

    let start_instant = Instant::now();

    if let Some(trace_arguments) = arguments.subcommand_matches("trace") {
        run_trace_subcommand(trace_arguments);
    }

    if arguments.is_present("timing") {
        println!("Elapsed time: {} s", start_instant.elapsed().as_secs_f64());
    }
}

/// Sets up logging to standard error, filtered by `RUST_LOG` if set.
fn initialize_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "ubk=debug,warn" } else { "warn" })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
