//! Healthcare professionals domain - practitioners linked to facilities

pub mod models;

pub use models::{CreateHealthcareProfessional, HealthcareProfessional};
