pub mod healthcare_professional;

pub use healthcare_professional::{CreateHealthcareProfessional, HealthcareProfessional};
