pub mod car;
pub mod csv_import;
pub mod user;
