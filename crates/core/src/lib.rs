//! Car catalog domain layer.
//!
//! Pure types, validation, and import accounting shared by the database,
//! pipeline, and API crates. Nothing in this crate performs I/O.

pub mod car;
pub mod car_import;
pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;
