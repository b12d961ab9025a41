//! Car catalog DTOs, field bounds, and request validation rules.
//!
//! The same [`CreateCar`] shape is produced by the CSV row validator and by
//! the JSON create endpoint, so both paths persist identical records.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

// ---------------------------------------------------------------------------
// Field bounds
// ---------------------------------------------------------------------------

/// Inclusive numeric bounds for an optional car attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
    /// Whether the stored column is an integer.
    pub integer: bool,
    /// When set, `min` itself is not an accepted value.
    pub exclusive_min: bool,
}

impl NumericBounds {
    const fn integer(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            integer: true,
            exclusive_min: false,
        }
    }

    /// Whether `value` satisfies these bounds.
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        if self.integer && value.fract() != 0.0 {
            return false;
        }
        let above_min = if self.exclusive_min {
            value > self.min
        } else {
            value >= self.min
        };
        above_min && value <= self.max
    }
}

pub const ENGINE_CYLINDERS_BOUNDS: NumericBounds = NumericBounds::integer(1.0, 16.0);

/// Engine displacement in litres.
pub const ENGINE_SIZE_BOUNDS: NumericBounds = NumericBounds {
    min: 0.0,
    max: 20.0,
    integer: false,
    exclusive_min: true,
};

pub const ENGINE_HORSEPOWER_BOUNDS: NumericBounds = NumericBounds::integer(1.0, 2000.0);
pub const ENGINE_HORSEPOWER_RPM_BOUNDS: NumericBounds = NumericBounds::integer(1.0, 10000.0);
pub const BODY_DOORS_BOUNDS: NumericBounds = NumericBounds::integer(1.0, 10.0);
pub const BODY_SEATS_BOUNDS: NumericBounds = NumericBounds::integer(1.0, 20.0);

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// A normalized car record ready for persistence.
///
/// Call [`CreateCar::trimmed`] before [`Validate::validate`] so that
/// whitespace-only required fields are rejected as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateCar {
    #[validate(length(min = 1, message = "Make name is required"))]
    pub make_name: String,
    #[validate(length(min = 1, message = "Model name is required"))]
    pub model_name: String,
    #[serde(default)]
    pub trim_name: Option<String>,
    #[serde(default)]
    pub trim_description: Option<String>,
    #[validate(length(min = 1, message = "Engine type is required"))]
    pub engine_type: String,
    #[serde(default)]
    pub engine_fuel_type: Option<String>,
    #[serde(default)]
    pub engine_drive_type: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 16, message = "Cylinders must be between 1 and 16"))]
    pub engine_cylinders: Option<i32>,
    #[serde(default)]
    #[validate(range(
        exclusive_min = 0.0,
        max = 20.0,
        message = "Engine size must be positive and cannot exceed 20 liters"
    ))]
    pub engine_size: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 2000, message = "Horsepower must be between 1 and 2000"))]
    pub engine_horsepower_hp: Option<i32>,
    #[serde(default)]
    #[validate(range(
        min = 1,
        max = 10000,
        message = "Horsepower RPM must be between 1 and 10000"
    ))]
    pub engine_horsepower_rpm: Option<i32>,
    #[validate(length(min = 1, message = "Body type is required"))]
    pub body_type: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 10, message = "Doors must be between 1 and 10"))]
    pub body_doors: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 20, message = "Seats must be between 1 and 20"))]
    pub body_seats: Option<i32>,
}

impl CreateCar {
    /// Trim every string field and collapse blank optionals to `None`.
    pub fn trimmed(self) -> Self {
        Self {
            make_name: self.make_name.trim().to_string(),
            model_name: self.model_name.trim().to_string(),
            trim_name: trim_optional(self.trim_name),
            trim_description: trim_optional(self.trim_description),
            engine_type: self.engine_type.trim().to_string(),
            engine_fuel_type: trim_optional(self.engine_fuel_type),
            engine_drive_type: trim_optional(self.engine_drive_type),
            body_type: self.body_type.trim().to_string(),
            ..self
        }
    }
}

/// A field of a partial update that may also be cleared.
///
/// `None` leaves the stored value alone, `Some(None)` (JSON `null`) clears
/// it, and `Some(Some(v))` replaces it.
pub type Nullable<T> = Option<Option<T>>;

/// DTO for a partial car update. All fields are optional; only present
/// fields are applied. Optional car attributes can be cleared with `null`;
/// a `null` required field counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateCar {
    #[validate(length(min = 1, message = "Make name cannot be empty"))]
    pub make_name: Option<String>,
    #[validate(length(min = 1, message = "Model name cannot be empty"))]
    pub model_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub trim_name: Nullable<String>,
    #[serde(default, deserialize_with = "present")]
    pub trim_description: Nullable<String>,
    #[validate(length(min = 1, message = "Engine type cannot be empty"))]
    pub engine_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub engine_fuel_type: Nullable<String>,
    #[serde(default, deserialize_with = "present")]
    pub engine_drive_type: Nullable<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 1, max = 16, message = "Cylinders must be between 1 and 16"))]
    pub engine_cylinders: Nullable<i32>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(
        exclusive_min = 0.0,
        max = 20.0,
        message = "Engine size must be positive and cannot exceed 20 liters"
    ))]
    pub engine_size: Nullable<f64>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 1, max = 2000, message = "Horsepower must be between 1 and 2000"))]
    pub engine_horsepower_hp: Nullable<i32>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(
        min = 1,
        max = 10000,
        message = "Horsepower RPM must be between 1 and 10000"
    ))]
    pub engine_horsepower_rpm: Nullable<i32>,
    #[validate(length(min = 1, message = "Body type cannot be empty"))]
    pub body_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 1, max = 10, message = "Doors must be between 1 and 10"))]
    pub body_doors: Nullable<i32>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 1, max = 20, message = "Seats must be between 1 and 20"))]
    pub body_seats: Nullable<i32>,
}

impl UpdateCar {
    /// Trim string fields. Required fields keep an empty string (so
    /// validation rejects them); a blank optional text field clears it.
    pub fn trimmed(self) -> Self {
        Self {
            make_name: self.make_name.map(|s| s.trim().to_string()),
            model_name: self.model_name.map(|s| s.trim().to_string()),
            trim_name: self.trim_name.map(trim_optional),
            trim_description: self.trim_description.map(trim_optional),
            engine_type: self.engine_type.map(|s| s.trim().to_string()),
            engine_fuel_type: self.engine_fuel_type.map(trim_optional),
            engine_drive_type: self.engine_drive_type.map(trim_optional),
            body_type: self.body_type.map(|s| s.trim().to_string()),
            ..self
        }
    }
}

/// Deserialize a field that is present in the body, `null` included.
/// Paired with `#[serde(default)]` so a missing field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Substring filters for car listings. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarFilter {
    pub make: Option<String>,
    pub model: Option<String>,
    pub body_type: Option<String>,
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
