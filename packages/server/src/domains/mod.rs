// Business domains
pub mod audit;
pub mod facilities;
pub mod healthcare_professionals;
pub mod submissions;
