//! Repository layer: one zero-sized struct per table, each method taking a
//! `&PgPool` and returning `sqlx::Error` on failure.

pub mod car_repo;
pub mod user_repo;

pub use car_repo::CarRepo;
pub use user_repo::UserRepo;
