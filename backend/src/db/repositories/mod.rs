//! Rating source implementations module.
//!
//! This module contains the implementations of the `RatingRecordSource` trait:
//! - `csv_file`: precomputed ratings CSV, loaded once and cached
//! - `local`: In-memory implementation for unit testing and local development
pub mod csv_file;
pub mod local;

pub use csv_file::CsvSource;
pub use local::LocalSource;
