// Healthcare Directory - API Core
//
// Contributors submit candidate facility listings; moderators review them and
// approval promotes a submission into a durable facility and healthcare
// professional. The lifecycle lives in domains/submissions/activities.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
