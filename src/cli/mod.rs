//! Command-line interface module.

mod args;
pub mod convert;
pub mod inspect;
pub mod serve;

pub use args::{Cli, Commands, ConvertArgs, KindArg, ResolveArgs, ServeArgs};
