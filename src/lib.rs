pub mod cli;
pub mod config;
pub mod error;
pub mod package;
pub mod recipe;
pub mod rewriter;
pub mod ui;
pub mod version;

pub use error::{ReplaceError, Result};
