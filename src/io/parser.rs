use crate::core::table::{CoefficientTable, EnergyBin, TableLayout};
use nalgebra::DMatrix;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label lines at the top of every coefficient table, discarded unparsed.
const HEADER_LINES: usize = 2;

/// Everything that can go wrong while loading a coefficient table.
///
/// The reference tooling reads rows unchecked and happily integrates stale
/// memory when a row is short; here every row is verified before a single
/// coefficient is accepted.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("could not read coefficient table {path:?}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("table ended early: expected {expected} data rows after the header, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("data row {row}: expected {expected} fields, found {found}")]
    WrongFieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("data row {row}: could not parse '{token}' as a number")]
    BadNumber { row: usize, token: String },
    #[error("data row {row}: energy midpoints must be in ascending order")]
    NonMonotonicEnergy { row: usize },
    #[error("data row {row}: energy bin width must be positive")]
    NonPositiveWidth { row: usize },
    #[error("{0}")]
    Inconsistent(&'static str),
}

/// Loads a dose-conversion coefficient table from disk.
///
/// Format: two header lines (labels, ignored), then one row per energy bin
/// containing `midpoint width coef[0] .. coef[species_count-1]`, whitespace
/// separated. Rows beyond `layout.bin_count` are ignored.
pub fn load_coefficients(path: &Path, layout: &TableLayout) -> Result<CoefficientTable, TableError> {
    let contents = fs::read_to_string(path).map_err(|source| TableError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_coefficients(&contents, layout)
}

/// Parses table text. Split from file access so tests can feed strings.
pub fn parse_coefficients(
    contents: &str,
    layout: &TableLayout,
) -> Result<CoefficientTable, TableError> {
    let expected_fields = 2 + layout.species_count;
    let mut lines = contents.lines();

    for _ in 0..HEADER_LINES {
        if lines.next().is_none() {
            return Err(TableError::Truncated {
                expected: layout.bin_count,
                found: 0,
            });
        }
    }

    let mut bins: Vec<EnergyBin> = Vec::with_capacity(layout.bin_count);
    let mut coefficients = DMatrix::zeros(layout.species_count, layout.bin_count);

    for ie in 0..layout.bin_count {
        let row = ie + 1;
        let line = lines.next().ok_or(TableError::Truncated {
            expected: layout.bin_count,
            found: ie,
        })?;

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != expected_fields {
            return Err(TableError::WrongFieldCount {
                row,
                expected: expected_fields,
                found: fields.len(),
            });
        }

        let midpoint_mev = parse_field(fields[0], row)?;
        let width_mev = parse_field(fields[1], row)?;
        if width_mev <= 0.0 {
            return Err(TableError::NonPositiveWidth { row });
        }
        if let Some(previous) = bins.last() {
            if midpoint_mev <= previous.midpoint_mev {
                return Err(TableError::NonMonotonicEnergy { row });
            }
        }

        for (ip, token) in fields[2..].iter().enumerate() {
            coefficients[(ip, ie)] = parse_field(token, row)?;
        }
        bins.push(EnergyBin {
            midpoint_mev,
            width_mev,
        });
    }

    CoefficientTable::new(bins, coefficients).map_err(TableError::Inconsistent)
}

fn parse_field(token: &str, row: usize) -> Result<f64, TableError> {
    token.parse::<f64>().map_err(|_| TableError::BadNumber {
        row,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LAYOUT: TableLayout = TableLayout {
        bin_count: 3,
        species_count: 2,
    };

    const GOOD_TABLE: &str = "\
energy width n p
MeV MeV pSv*cm2 pSv*cm2
1.0 0.5 10.0 20.0
2.0 1.0 11.0 21.0
4.0 2.0 12.0 22.0
";

    #[test]
    fn parses_a_well_formed_table() {
        let table = parse_coefficients(GOOD_TABLE, &LAYOUT).unwrap();
        assert_eq!(table.bin_count(), 3);
        assert_eq!(table.species_count(), 2);
        assert_eq!(table.bins()[1].midpoint_mev, 2.0);
        assert_eq!(table.bins()[2].width_mev, 2.0);
        // Species select rows, bins select columns.
        assert_eq!(table.coefficient(0, 0), 10.0);
        assert_eq!(table.coefficient(1, 2), 22.0);
    }

    #[test]
    fn ignores_rows_beyond_the_layout() {
        let with_extra = format!("{GOOD_TABLE}8.0 4.0 13.0 23.0\n");
        let table = parse_coefficients(&with_extra, &LAYOUT).unwrap();
        assert_eq!(table.bin_count(), 3);
    }

    #[test]
    fn rejects_truncated_tables() {
        let short = "header\nheader\n1.0 0.5 10.0 20.0\n";
        match parse_coefficients(short, &LAYOUT) {
            Err(TableError::Truncated { expected: 3, found: 1 }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_header() {
        match parse_coefficients("only one line\n", &LAYOUT) {
            Err(TableError::Truncated { .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_short_rows() {
        let bad = "h\nh\n1.0 0.5 10.0 20.0\n2.0 1.0 11.0\n4.0 2.0 12.0 22.0\n";
        match parse_coefficients(bad, &LAYOUT) {
            Err(TableError::WrongFieldCount {
                row: 2,
                expected: 4,
                found: 3,
            }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let bad = "h\nh\n1.0 0.5 ten 20.0\n2.0 1.0 11.0 21.0\n4.0 2.0 12.0 22.0\n";
        match parse_coefficients(bad, &LAYOUT) {
            Err(TableError::BadNumber { row: 1, token }) => assert_eq!(token, "ten"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_decreasing_midpoints() {
        let bad = "h\nh\n1.0 0.5 10.0 20.0\n0.5 1.0 11.0 21.0\n4.0 2.0 12.0 22.0\n";
        match parse_coefficients(bad, &LAYOUT) {
            Err(TableError::NonMonotonicEnergy { row: 2 }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_width_bins() {
        let bad = "h\nh\n1.0 0.0 10.0 20.0\n2.0 1.0 11.0 21.0\n4.0 2.0 12.0 22.0\n";
        match parse_coefficients(bad, &LAYOUT) {
            Err(TableError::NonPositiveWidth { row: 1 }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn loads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GOOD_TABLE.as_bytes()).unwrap();
        let table = load_coefficients(file.path(), &LAYOUT).unwrap();
        assert_eq!(table.bin_count(), 3);
    }

    #[test]
    fn reports_missing_files() {
        let missing = Path::new("no/such/table.inp");
        match load_coefficients(missing, &LAYOUT) {
            Err(TableError::Unreadable { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
