//! Car entity model and DTOs.

use carbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub use carbase_core::car::{CarFilter, CreateCar, UpdateCar};

/// A row from the `cars` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Car {
    pub id: DbId,
    pub make_name: String,
    pub model_name: String,
    pub trim_name: Option<String>,
    pub trim_description: Option<String>,
    pub engine_type: String,
    pub engine_fuel_type: Option<String>,
    pub engine_drive_type: Option<String>,
    pub engine_cylinders: Option<i32>,
    pub engine_size: Option<f64>,
    pub engine_horsepower_hp: Option<i32>,
    pub engine_horsepower_rpm: Option<i32>,
    pub body_type: String,
    pub body_doors: Option<i32>,
    pub body_seats: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One page of cars plus the number of rows matching the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CarPage {
    pub items: Vec<Car>,
    pub total: i64,
}
