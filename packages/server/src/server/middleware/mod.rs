pub mod actor;

pub use actor::{extract_actor, Actor, ACTOR_HEADER};
