// HTTP routes
pub mod health;
pub mod response;
pub mod submissions;

pub use health::*;
pub use response::ApiResponse;
pub use submissions::*;
