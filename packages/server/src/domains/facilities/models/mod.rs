pub mod facility;

pub use facility::{CreateFacility, Facility};
