//! Reading seed points from an input file.

use super::Seeder3;
use crate::{geometry::Point3, io::utils, tracing::ftr};
use std::{
    io::{self, BufRead},
    path::Path,
    vec,
};

/// Generator for 3D seed points read from an input file.
#[derive(Clone, Debug)]
pub struct ManualSeeder3 {
    seed_points: Vec<Point3<ftr>>,
}

impl ManualSeeder3 {
    /// Creates a new seeder producing 3D seed points read from an input file.
    ///
    /// The input file is assumed to be in CSV format, with each line consisting
    /// of the three comma-separated coordinates [planetary radii] of a single
    /// seed point. Empty lines and lines starting with `#` are skipped.
    ///
    /// # Parameters
    ///
    /// - `input_file_path`: Path to the input file.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains a new `ManualSeeder3`.
    /// - `Err`: Contains an error encountered while trying to open or parse the input file.
    pub fn new(input_file_path: &Path) -> io::Result<Self> {
        let file = utils::open_file_and_map_err(input_file_path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Creates a new seeder producing 3D seed points parsed from CSV lines
    /// read from the given reader.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let seed_points = reader
            .lines()
            .filter_map(|line_result| match line_result {
                Ok(line) => {
                    let trimmed_line = line.trim();
                    if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                        None
                    } else {
                        Some(parse_seed_point(trimmed_line))
                    }
                }
                Err(err) => Some(Err(err)),
            })
            .collect::<io::Result<Vec<_>>>()?;
        Ok(Self { seed_points })
    }
}

fn parse_seed_point(line: &str) -> io::Result<Point3<ftr>> {
    let coords = line
        .split(',')
        .map(|coord_str| {
            coord_str.trim().parse::<ftr>().map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Failed parsing coordinate string {} in input file: {}",
                        coord_str, err
                    ),
                )
            })
        })
        .collect::<io::Result<Vec<ftr>>>()?;
    if coords.len() == 3 {
        Ok(Point3::with_each_component(|dim| coords[dim.num()]))
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Expected three coordinates in input file line, got {}: {}",
                coords.len(),
                line
            ),
        ))
    }
}

impl IntoIterator for ManualSeeder3 {
    type Item = Point3<ftr>;
    type IntoIter = vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.seed_points.into_iter()
    }
}

impl Seeder3 for ManualSeeder3 {
    fn number_of_points(&self) -> usize {
        self.seed_points.len()
    }

    fn retain_points<P>(&mut self, predicate: P)
    where
        P: FnMut(&Point3<ftr>) -> bool,
    {
        self.seed_points.retain(predicate);
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parsing_skips_comments_and_blank_lines() {
        let input = "# x, y, z\n2.0, 0.0, 0.0\n\n  3.5,-1.0 , 0.25\n";
        let seeder = ManualSeeder3::from_reader(input.as_bytes()).unwrap();
        assert_eq!(seeder.number_of_points(), 2);
        let points: Vec<_> = seeder.into_iter().collect();
        assert_eq!(points[1], Point3::new(3.5, -1.0, 0.25));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        let err = ManualSeeder3::from_reader("2.0, zero, 0.0\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(ManualSeeder3::from_reader("2.0, 0.0\n".as_bytes()).is_err());
    }
}
