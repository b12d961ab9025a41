//! Row-level validation and normalization for CSV car imports.
//!
//! A row is valid only when every required column is present and every
//! numeric column parses and falls within its bounds. All checks run before
//! any normalization, so a rejected row never yields a partial record.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::car::{
    CreateCar, NumericBounds, BODY_DOORS_BOUNDS, BODY_SEATS_BOUNDS, ENGINE_CYLINDERS_BOUNDS,
    ENGINE_HORSEPOWER_BOUNDS, ENGINE_HORSEPOWER_RPM_BOUNDS, ENGINE_SIZE_BOUNDS,
};

/// One CSV row: column label to raw cell text, in header order.
pub type RawRow = IndexMap<String, String>;

// ---------------------------------------------------------------------------
// Column labels
// ---------------------------------------------------------------------------

pub const COL_MAKE_NAME: &str = "Make Name";
pub const COL_MODEL_NAME: &str = "Model Name";
pub const COL_TRIM_NAME: &str = "Trim Name";
pub const COL_TRIM_DESCRIPTION: &str = "Trim Description";
pub const COL_ENGINE_TYPE: &str = "Engine Type";
pub const COL_ENGINE_FUEL_TYPE: &str = "Engine Fuel Type";
pub const COL_ENGINE_DRIVE_TYPE: &str = "Engine Drive Type";
pub const COL_ENGINE_CYLINDERS: &str = "Engine Cylinders";
pub const COL_ENGINE_SIZE: &str = "Engine Size";
pub const COL_ENGINE_HORSEPOWER_HP: &str = "Engine Horsepower Hp";
pub const COL_ENGINE_HORSEPOWER_RPM: &str = "Engine Horsepower Rpm";
pub const COL_BODY_TYPE: &str = "Body Type";
pub const COL_BODY_DOORS: &str = "Body Doors";
pub const COL_BODY_SEATS: &str = "Body Seats";

/// Columns that must be present and non-blank, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 4] =
    [COL_MAKE_NAME, COL_MODEL_NAME, COL_ENGINE_TYPE, COL_BODY_TYPE];

/// The first decimal number embedded in a cell, e.g. `"300 hp"` -> `300`.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid regex"));

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Why a row was rejected, with the raw cells kept for the import log.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    pub row_number: u64,
    pub errors: Vec<String>,
    pub raw: RawRow,
}

/// Result of validating a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValidation {
    Valid(CreateCar),
    Invalid(RowRejection),
}

impl RowValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, RowValidation::Valid(_))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a numeric cell, tolerating surrounding units or text.
///
/// The first decimal-number substring wins; when there is none, the trimmed
/// text is parsed directly (this admits forms like `1e3`). Blank input and
/// non-finite results yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(found) = NUMBER_RE.find(trimmed) {
        return found.as_str().parse::<f64>().ok().filter(|n| n.is_finite());
    }

    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The cell for `label` when it exists and is not blank after trimming.
/// Returns the untrimmed text so error messages quote what the user sent.
fn non_blank<'a>(row: &'a RawRow, label: &str) -> Option<&'a str> {
    row.get(label)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn trimmed_cell(row: &RawRow, label: &str) -> Option<String> {
    non_blank(row, label).map(|value| value.trim().to_string())
}

/// Check one numeric column, appending any error. Returns the parsed value
/// only when it is usable.
fn numeric_cell(
    row: &RawRow,
    label: &str,
    bounds: NumericBounds,
    errors: &mut Vec<String>,
) -> Option<f64> {
    let raw = non_blank(row, label)?;

    let Some(value) = parse_number(raw) else {
        errors.push(format!("{label} must be a number (got: \"{raw}\")"));
        return None;
    };

    if !bounds.contains(value) {
        errors.push(range_message(label, bounds, raw));
        return None;
    }

    Some(value)
}

fn range_message(label: &str, bounds: NumericBounds, raw: &str) -> String {
    let NumericBounds { min, max, .. } = bounds;
    if bounds.integer {
        format!("{label} must be a whole number between {min} and {max} (got: \"{raw}\")")
    } else if bounds.exclusive_min {
        format!("{label} must be greater than {min} and at most {max} (got: \"{raw}\")")
    } else {
        format!("{label} must be between {min} and {max} (got: \"{raw}\")")
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate one raw CSV row. `row_number` is 1-based over data rows.
pub fn validate_row(row: &RawRow, row_number: u64) -> RowValidation {
    let mut errors = Vec::new();

    for label in REQUIRED_COLUMNS {
        if non_blank(row, label).is_none() {
            errors.push(format!("{label} is required"));
        }
    }

    let cylinders = numeric_cell(row, COL_ENGINE_CYLINDERS, ENGINE_CYLINDERS_BOUNDS, &mut errors);
    let size = numeric_cell(row, COL_ENGINE_SIZE, ENGINE_SIZE_BOUNDS, &mut errors);
    let horsepower = numeric_cell(
        row,
        COL_ENGINE_HORSEPOWER_HP,
        ENGINE_HORSEPOWER_BOUNDS,
        &mut errors,
    );
    let rpm = numeric_cell(
        row,
        COL_ENGINE_HORSEPOWER_RPM,
        ENGINE_HORSEPOWER_RPM_BOUNDS,
        &mut errors,
    );
    let doors = numeric_cell(row, COL_BODY_DOORS, BODY_DOORS_BOUNDS, &mut errors);
    let seats = numeric_cell(row, COL_BODY_SEATS, BODY_SEATS_BOUNDS, &mut errors);

    if !errors.is_empty() {
        return RowValidation::Invalid(RowRejection {
            row_number,
            errors,
            raw: row.clone(),
        });
    }

    // Integer columns passed a whole-number bounds check, so the casts are exact.
    RowValidation::Valid(CreateCar {
        make_name: trimmed_cell(row, COL_MAKE_NAME).unwrap_or_default(),
        model_name: trimmed_cell(row, COL_MODEL_NAME).unwrap_or_default(),
        trim_name: trimmed_cell(row, COL_TRIM_NAME),
        trim_description: trimmed_cell(row, COL_TRIM_DESCRIPTION),
        engine_type: trimmed_cell(row, COL_ENGINE_TYPE).unwrap_or_default(),
        engine_fuel_type: trimmed_cell(row, COL_ENGINE_FUEL_TYPE),
        engine_drive_type: trimmed_cell(row, COL_ENGINE_DRIVE_TYPE),
        engine_cylinders: cylinders.map(|n| n as i32),
        engine_size: size,
        engine_horsepower_hp: horsepower.map(|n| n as i32),
        engine_horsepower_rpm: rpm.map(|n| n as i32),
        body_type: trimmed_cell(row, COL_BODY_TYPE).unwrap_or_default(),
        body_doors: doors.map(|n| n as i32),
        body_seats: seats.map(|n| n as i32),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_row() -> RawRow {
        row(&[
            (COL_MAKE_NAME, " Ford "),
            (COL_MODEL_NAME, "Mustang"),
            (COL_TRIM_NAME, "GT"),
            (COL_TRIM_DESCRIPTION, "2dr Coupe"),
            (COL_ENGINE_TYPE, "gas"),
            (COL_ENGINE_FUEL_TYPE, "premium unleaded"),
            (COL_ENGINE_DRIVE_TYPE, "rear wheel drive"),
            (COL_ENGINE_CYLINDERS, "8"),
            (COL_ENGINE_SIZE, "5.0"),
            (COL_ENGINE_HORSEPOWER_HP, "480 hp"),
            (COL_ENGINE_HORSEPOWER_RPM, "7000"),
            (COL_BODY_TYPE, "Coupe"),
            (COL_BODY_DOORS, "2"),
            (COL_BODY_SEATS, "4"),
        ])
    }

    // -- parse_number --------------------------------------------------------

    #[test]
    fn parse_number_extracts_embedded_value() {
        assert_eq!(parse_number("300 hp"), Some(300.0));
        assert_eq!(parse_number("2.5L"), Some(2.5));
        assert_eq!(parse_number("  6500 rpm "), Some(6500.0));
    }

    #[test]
    fn parse_number_falls_back_to_direct_parse() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn parse_number_rejects_text_and_blank() {
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number(""), None);
    }

    // -- validate_row --------------------------------------------------------

    #[test]
    fn full_row_is_normalized() {
        let RowValidation::Valid(car) = validate_row(&full_row(), 1) else {
            panic!("row should be valid");
        };
        assert_eq!(car.make_name, "Ford");
        assert_eq!(car.trim_name.as_deref(), Some("GT"));
        assert_eq!(car.engine_cylinders, Some(8));
        assert_eq!(car.engine_size, Some(5.0));
        assert_eq!(car.engine_horsepower_hp, Some(480));
        assert_eq!(car.body_doors, Some(2));
    }

    #[test]
    fn missing_required_field_is_named() {
        for label in REQUIRED_COLUMNS {
            let mut r = full_row();
            r.shift_remove(label);
            let outcome = validate_row(&r, 7);
            assert_matches!(outcome, RowValidation::Invalid(rejection) => {
                assert_eq!(rejection.row_number, 7);
                assert_eq!(rejection.errors, vec![format!("{label} is required")]);
            });
        }
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut r = full_row();
        r.insert(COL_BODY_TYPE.to_string(), "   ".to_string());
        assert_matches!(validate_row(&r, 1), RowValidation::Invalid(rejection) => {
            assert_eq!(rejection.errors, vec!["Body Type is required".to_string()]);
        });
    }

    #[test]
    fn non_numeric_value_is_quoted_in_error() {
        let mut r = full_row();
        r.insert(COL_ENGINE_SIZE.to_string(), "abc".to_string());
        assert_matches!(validate_row(&r, 3), RowValidation::Invalid(rejection) => {
            assert_eq!(
                rejection.errors,
                vec!["Engine Size must be a number (got: \"abc\")".to_string()]
            );
            assert_eq!(rejection.raw[COL_ENGINE_SIZE], "abc");
        });
    }

    #[test]
    fn required_and_numeric_errors_are_all_reported() {
        let r = row(&[
            (COL_MODEL_NAME, "Civic"),
            (COL_ENGINE_TYPE, "gas"),
            (COL_BODY_TYPE, "Sedan"),
            (COL_BODY_SEATS, "many"),
        ]);
        assert_matches!(validate_row(&r, 1), RowValidation::Invalid(rejection) => {
            assert_eq!(rejection.errors.len(), 2);
            assert_eq!(rejection.errors[0], "Make Name is required");
            assert!(rejection.errors[1].contains("many"));
        });
    }

    #[test]
    fn blank_optionals_map_to_none() {
        let r = row(&[
            (COL_MAKE_NAME, "Honda"),
            (COL_MODEL_NAME, "Civic"),
            (COL_TRIM_NAME, ""),
            (COL_ENGINE_TYPE, "gas"),
            (COL_ENGINE_CYLINDERS, " "),
            (COL_ENGINE_SIZE, ""),
            (COL_ENGINE_HORSEPOWER_HP, ""),
            (COL_ENGINE_HORSEPOWER_RPM, ""),
            (COL_BODY_TYPE, "Sedan"),
            (COL_BODY_DOORS, ""),
            (COL_BODY_SEATS, ""),
        ]);
        let RowValidation::Valid(car) = validate_row(&r, 1) else {
            panic!("row should be valid");
        };
        assert_eq!(car.trim_name, None);
        assert_eq!(car.trim_description, None);
        assert_eq!(car.engine_cylinders, None);
        assert_eq!(car.engine_size, None);
        assert_eq!(car.engine_horsepower_hp, None);
        assert_eq!(car.engine_horsepower_rpm, None);
        assert_eq!(car.body_doors, None);
        assert_eq!(car.body_seats, None);
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let mut r = full_row();
        r.insert(COL_ENGINE_CYLINDERS.to_string(), "24".to_string());
        assert_matches!(validate_row(&r, 1), RowValidation::Invalid(rejection) => {
            assert_eq!(
                rejection.errors,
                vec![
                    "Engine Cylinders must be a whole number between 1 and 16 (got: \"24\")"
                        .to_string()
                ]
            );
        });
    }

    #[test]
    fn fractional_integer_column_is_rejected() {
        let mut r = full_row();
        r.insert(COL_BODY_DOORS.to_string(), "4.5".to_string());
        assert!(!validate_row(&r, 1).is_valid());
    }
}
