use super::traits::{PointSetLoader, PointSetWriter, ResultConsumer};
use crate::core::models::point::{Point, PointSet};
use crate::core::models::solution::Solution;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid {axis} value on line {line}: '{value}'")]
    InvalidFloat {
        axis: char,
        line: usize,
        value: String,
    },
    #[error("Column length mismatch: {x_count} x values but {y_count} y values")]
    LengthMismatch { x_count: usize, y_count: usize },
}

/// The paired column format.
///
/// Each point set is stored as two plain-text files, one holding the x coordinates
/// and one holding the y coordinates, one value per line. Blank lines and surrounding
/// whitespace (including a trailing `\r`) are ignored.
pub struct ColumnFile;

fn read_column(reader: &mut impl BufRead, axis: char) -> Result<Vec<f64>, ColumnError> {
    let mut values = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| ColumnError::InvalidFloat {
                axis,
                line: idx + 1,
                value: trimmed.to_string(),
            })?;
        values.push(value);
    }
    Ok(values)
}

impl PointSetLoader for ColumnFile {
    type Error = ColumnError;

    fn read_from(
        x_reader: &mut impl BufRead,
        y_reader: &mut impl BufRead,
    ) -> Result<PointSet, Self::Error> {
        let xs = read_column(x_reader, 'x')?;
        let ys = read_column(y_reader, 'y')?;
        if xs.len() != ys.len() {
            return Err(ColumnError::LengthMismatch {
                x_count: xs.len(),
                y_count: ys.len(),
            });
        }
        Ok(xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| Point::new(x, y))
            .collect())
    }
}

impl PointSetWriter for ColumnFile {
    type Error = ColumnError;

    fn write_to(
        points: &[Point],
        x_writer: &mut impl Write,
        y_writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for p in points {
            writeln!(x_writer, "{}", p.x)?;
            writeln!(y_writer, "{}", p.y)?;
        }
        Ok(())
    }
}

/// Persists the points of a solution as a pair of column files.
#[derive(Debug, Clone)]
pub struct ColumnOutput {
    pub x_path: PathBuf,
    pub y_path: PathBuf,
}

impl ColumnOutput {
    pub fn new(x_path: impl Into<PathBuf>, y_path: impl Into<PathBuf>) -> Self {
        Self {
            x_path: x_path.into(),
            y_path: y_path.into(),
        }
    }
}

impl ResultConsumer for ColumnOutput {
    type Error = ColumnError;

    fn consume(&mut self, solution: &Solution) -> Result<(), Self::Error> {
        ColumnFile::write_to_paths(&solution.points, &self.x_path, &self.y_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::solution::Termination;
    use std::io::Cursor;

    #[test]
    fn reads_points_and_ignores_blank_lines_and_carriage_returns() {
        let mut xs = Cursor::new("1.5\r\n-2\r\n\r\n3e-1\r\n");
        let mut ys = Cursor::new("  0.25\n4\n-7.5\n\n");
        let points = ColumnFile::read_from(&mut xs, &mut ys).unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(1.5, 0.25),
                Point::new(-2.0, 4.0),
                Point::new(0.3, -7.5),
            ]
        );
    }

    #[test]
    fn mismatched_column_lengths_are_rejected() {
        let mut xs = Cursor::new("1\n2\n3\n");
        let mut ys = Cursor::new("1\n2\n");
        let result = ColumnFile::read_from(&mut xs, &mut ys);
        assert!(matches!(
            result,
            Err(ColumnError::LengthMismatch {
                x_count: 3,
                y_count: 2
            })
        ));
    }

    #[test]
    fn invalid_value_reports_axis_and_line() {
        let mut xs = Cursor::new("1\n2\n");
        let mut ys = Cursor::new("1\nabc\n");
        match ColumnFile::read_from(&mut xs, &mut ys) {
            Err(ColumnError::InvalidFloat { axis, line, value }) => {
                assert_eq!(axis, 'y');
                assert_eq!(line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("Expected InvalidFloat, got {:?}", other),
        }
    }

    #[test]
    fn written_files_load_back_to_the_same_points() {
        let dir = tempfile::tempdir().unwrap();
        let x_path = dir.path().join("xx.txt");
        let y_path = dir.path().join("yy.txt");
        let points = vec![Point::new(5.42641287, -9.58496101), Point::new(-0.1, 1e-7)];

        ColumnFile::write_to_paths(&points, &x_path, &y_path).unwrap();
        let loaded = ColumnFile::read_from_paths(&x_path, &y_path).unwrap();

        assert_eq!(loaded, points);
    }

    #[test]
    fn column_output_persists_solution_points() {
        let dir = tempfile::tempdir().unwrap();
        let mut output = ColumnOutput::new(dir.path().join("x.txt"), dir.path().join("y.txt"));
        let solution = Solution::new(
            vec![Point::new(1.0, 2.0)],
            0.5,
            10,
            Termination::Converged,
        );

        output.consume(&solution).unwrap();

        let x = std::fs::read_to_string(&output.x_path).unwrap();
        let y = std::fs::read_to_string(&output.y_path).unwrap();
        assert_eq!(x, "1\n");
        assert_eq!(y, "2\n");
    }

    #[test]
    fn missing_file_propagates_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            ColumnFile::read_from_paths(dir.path().join("nope-x"), dir.path().join("nope-y"));
        assert!(matches!(result, Err(ColumnError::Io(_))));
    }
}
