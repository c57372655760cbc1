//! Utilities for input/output.

use std::{fs, io, path::Path};

#[cfg(feature = "json")]
use serde::Serialize;

/// Opens the file at the given path, adding the path to any error message.
pub fn open_file_and_map_err(file_path: &Path) -> io::Result<fs::File> {
    fs::File::open(file_path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Could not open {}: {}", file_path.display(), err),
        )
    })
}

/// Creates (or truncates) the file at the given path, adding the path to any
/// error message.
pub fn create_file_and_map_err(file_path: &Path) -> io::Result<fs::File> {
    fs::File::create(file_path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Could not create {}: {}", file_path.display(), err),
        )
    })
}

/// Serializes the given data into JSON and writes it to the given writer.
#[cfg(feature = "json")]
pub fn write_data_as_json<T: Serialize, W: io::Write>(writer: W, data: &T) -> io::Result<()> {
    serde_json::to_writer(writer, data).map_err(io::Error::from)
}
