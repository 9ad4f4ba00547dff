pub use crate::errors::{ArgumentCountKind, Location, VellumError};

pub mod ast;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod macros;
pub mod runtime;
