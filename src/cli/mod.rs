pub mod orchestration;

pub use orchestration::{run, RunReport};
