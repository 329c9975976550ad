//! Facilities domain - durable directory facilities

pub mod models;

pub use models::{CreateFacility, Facility};
