use crate::core::models::point::{Point, PointSet};
use crate::core::models::solution::Solution;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading point sets from a persisted coordinate format.
///
/// The x and y coordinates arrive through two separate readers, matching formats
/// that store each coordinate axis in its own stream.
pub trait PointSetLoader {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a point set from a pair of buffered readers.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed, if the two streams disagree on
    /// the number of points, or if reading fails.
    fn read_from(
        x_reader: &mut impl BufRead,
        y_reader: &mut impl BufRead,
    ) -> Result<PointSet, Self::Error>;

    /// Reads a point set from a pair of file paths.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or parsing fails.
    fn read_from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        x_path: P,
        y_path: Q,
    ) -> Result<PointSet, Self::Error> {
        let mut x_reader = BufReader::new(File::open(x_path)?);
        let mut y_reader = BufReader::new(File::open(y_path)?);
        Self::read_from(&mut x_reader, &mut y_reader)
    }
}

/// Defines the interface for writing point sets to a persisted coordinate format.
pub trait PointSetWriter {
    /// The error type for write operations.
    type Error: Error + From<io::Error>;

    /// Writes the x coordinates to one writer and the y coordinates to the other.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        points: &[Point],
        x_writer: &mut impl Write,
        y_writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a point set to a pair of file paths, creating or truncating both.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be created or writing fails.
    fn write_to_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        points: &[Point],
        x_path: P,
        y_path: Q,
    ) -> Result<(), Self::Error> {
        let mut x_writer = BufWriter::new(File::create(x_path)?);
        let mut y_writer = BufWriter::new(File::create(y_path)?);
        Self::write_to(points, &mut x_writer, &mut y_writer)?;
        x_writer.flush()?;
        y_writer.flush()?;
        Ok(())
    }
}

/// Accepts a finished [`Solution`] and renders or persists it.
pub trait ResultConsumer {
    type Error;

    fn consume(&mut self, solution: &Solution) -> Result<(), Self::Error>;
}
