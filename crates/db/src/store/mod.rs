//! The record store handlers and the import pipeline write through.
//!
//! [`CarStore`] hides whether cars live in PostgreSQL ([`PgCarStore`]) or in
//! process memory ([`MemoryCarStore`]). Both enforce the same identity rule:
//! make, model, trim (missing trim counts as empty), engine type and body
//! type together must be unique.

use async_trait::async_trait;
use carbase_core::pagination::PageRequest;
use carbase_core::types::DbId;

use crate::models::car::{Car, CarFilter, CarPage, CreateCar, UpdateCar};

mod memory;
mod postgres;

pub use memory::MemoryCarStore;
pub use postgres::PgCarStore;

/// Name of the uniqueness rule over a car's identifying fields.
pub const CAR_IDENTITY_CONSTRAINT: &str = "uq_cars_identity";

/// Failure reported by a [`CarStore`].
///
/// The `Display` text is what the import log records for a refused insert.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated.
    #[error("{0}")]
    Conflict(String),

    #[error("Record not found")]
    NotFound,

    /// Any other storage failure.
    #[error("{0}")]
    Internal(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn identity_conflict() -> StoreError {
    StoreError::Conflict(format!(
        "Duplicate value violates unique constraint: {CAR_IDENTITY_CONSTRAINT}"
    ))
}

#[async_trait]
pub trait CarStore: Send + Sync {
    async fn create(&self, input: &CreateCar) -> StoreResult<Car>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Car>>;

    /// One page of cars matching `filter`, newest first, with the total
    /// match count.
    async fn list(&self, filter: &CarFilter, page: PageRequest) -> StoreResult<CarPage>;

    /// Case-insensitive substring search over make, model, trim and body
    /// type, newest first.
    async fn search(&self, term: &str, limit: i64) -> StoreResult<Vec<Car>>;

    /// Apply the present fields of `input`. `None` when `id` is unknown.
    async fn update(&self, id: DbId, input: &UpdateCar) -> StoreResult<Option<Car>>;

    /// Returns `true` if a car was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;
}
