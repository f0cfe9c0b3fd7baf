pub mod cli;
pub mod command;
pub mod error;
pub mod exec;
pub mod forge;
pub mod git;
pub mod json_path;
pub mod release;
pub mod result;

pub use cli::{Args, Command};
pub use result::Result;
