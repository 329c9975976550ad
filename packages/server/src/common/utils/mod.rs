pub mod name_parser;
pub mod timestamp;

pub use name_parser::*;
pub use timestamp::now_micros;
