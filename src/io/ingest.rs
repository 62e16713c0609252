//! CSV ingest for the command-line front-end.
//!
//! Turns a delimited text file into the cleaned `(x, y)` sequence the fitting
//! core expects:
//! - columns chosen by header name or 1-based position (defaults: first two)
//! - row-level validation: bad rows are skipped and reported, not fatal
//! - only finite numbers reach the fitter
//!
//! No fitting logic lives here.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{DataPoint, DatasetStats};
use crate::error::AppError;

/// Which columns to read and how the file is laid out.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Header name or 1-based column position for x (default: column 1).
    pub x_column: Option<String>,
    /// Header name or 1-based column position for y (default: column 2).
    pub y_column: Option<String>,
    /// Treat the first row as data rather than a header.
    pub no_header: bool,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: cleaned points + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub source: String,
    pub points: Vec<DataPoint>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedData {
    pub fn rows_used(&self) -> usize {
        self.points.len()
    }
}

/// Load points from a CSV file.
pub fn load_points(path: &Path, opts: &IngestOptions) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    load_points_from_reader(file, opts, &path.display().to_string())
}

/// Load points from any reader (used by `load_points` and tests).
pub fn load_points_from_reader<R: Read>(
    reader: R,
    opts: &IngestOptions,
    source: &str,
) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(!opts.no_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header_map = if opts.no_header {
        None
    } else {
        let headers = reader
            .headers()
            .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?;
        Some(build_header_map(headers))
    };

    let x_idx = resolve_column(opts.x_column.as_deref(), 0, header_map.as_ref())?;
    let y_idx = resolve_column(opts.y_column.as_deref(), 1, header_map.as_ref())?;
    if x_idx == y_idx {
        return Err(AppError::new(2, "x and y must be different columns."));
    }

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let first_line = if opts.no_header { 1 } else { 2 };

    for (idx, result) in reader.records().enumerate() {
        let line = idx + first_line;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, x_idx, y_idx) {
            Ok(point) => points.push(point),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let stats = DatasetStats::from_points(&points)
        .ok_or_else(|| AppError::new(3, format!("No valid rows in '{source}'.")))?;

    Ok(IngestedData {
        source: source.to_string(),
        points,
        stats,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn resolve_column(
    column: Option<&str>,
    default_idx: usize,
    header_map: Option<&HashMap<String, usize>>,
) -> Result<usize, AppError> {
    let Some(column) = column else {
        return Ok(default_idx);
    };
    if let Ok(position) = column.trim().parse::<usize>() {
        if position == 0 {
            return Err(AppError::new(2, "Column positions are 1-based."));
        }
        return Ok(position - 1);
    }
    let Some(map) = header_map else {
        return Err(AppError::new(
            2,
            format!("Column '{column}' given by name, but the file has no header row."),
        ));
    };
    map.get(&normalize_header_name(column))
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing column '{column}'.")))
}

fn parse_row(record: &StringRecord, x_idx: usize, y_idx: usize) -> Result<DataPoint, String> {
    let x = parse_field(record, x_idx, "x")?;
    let y = parse_field(record, y_idx, "y")?;
    Ok(DataPoint::new(x, y))
}

fn parse_field(record: &StringRecord, idx: usize, label: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .ok_or_else(|| format!("missing {label} (column {})", idx + 1))?;
    if raw.is_empty() {
        return Err(format!("empty {label}"));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("{label} is not a number: '{raw}'"))?;
    if !value.is_finite() {
        return Err(format!("{label} is not finite: '{raw}'"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str, opts: &IngestOptions) -> Result<IngestedData, AppError> {
        load_points_from_reader(text.as_bytes(), opts, "test")
    }

    #[test]
    fn reads_first_two_columns_by_default() {
        let data = load("x,y\n0,1\n1,3\n2,5\n", &IngestOptions::default()).unwrap();
        assert_eq!(
            data.points,
            vec![DataPoint::new(0.0, 1.0), DataPoint::new(1.0, 3.0), DataPoint::new(2.0, 5.0)]
        );
        assert_eq!(data.rows_read, 3);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.stats.n_points, 3);
    }

    #[test]
    fn selects_columns_by_name_with_bom_and_case() {
        let text = "\u{feff}Time,Temp,Pressure\n1,20.5,101\n2,21.0,99\n";
        let opts = IngestOptions {
            x_column: Some("time".into()),
            y_column: Some("PRESSURE".into()),
            no_header: false,
        };
        let data = load(text, &opts).unwrap();
        assert_eq!(data.points, vec![DataPoint::new(1.0, 101.0), DataPoint::new(2.0, 99.0)]);
    }

    #[test]
    fn selects_columns_by_position_without_header() {
        let opts = IngestOptions {
            x_column: Some("3".into()),
            y_column: Some("1".into()),
            no_header: true,
        };
        let data = load("5,0,1\n6,0,2\n", &opts).unwrap();
        assert_eq!(data.points, vec![DataPoint::new(1.0, 5.0), DataPoint::new(2.0, 6.0)]);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let text = "x,y\n1,2\nabc,3\n4,\n5,NaN\n6,7\n8\n";
        let data = load(text, &IngestOptions::default()).unwrap();
        assert_eq!(data.points.len(), 2);
        assert_eq!(data.rows_read, 6);
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 7]);
    }

    #[test]
    fn missing_named_column_is_an_error() {
        let opts = IngestOptions {
            y_column: Some("missing".into()),
            ..IngestOptions::default()
        };
        let err = load("a,b\n1,2\n", &opts).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_valid_rows_is_an_error() {
        let err = load("x,y\nfoo,bar\n", &IngestOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
