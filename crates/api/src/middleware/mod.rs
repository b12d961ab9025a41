//! Request extractors that guard routes.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.

pub mod auth;
