//! santactl invocation.
//!
//! command -> CommandBuilder / CommandSpec / Operation (argument vectors)
//! invoke  -> Runner trait, ProcessRunner (tokio child process), Invocation
//!
//! No shell is ever involved: every argument is passed as a discrete token.

mod command;
mod invoke;

pub use command::{
    CommandBuilder, CommandSpec, DEFAULT_ELEVATION, DEFAULT_SANTACTL_PATH, JSON_FLAG, Operation,
};
pub use invoke::{Invocation, ProcessRunner, Runner};
