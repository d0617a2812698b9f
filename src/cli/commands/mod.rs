//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! configuration once and routes CLI subcommands to their implementations.

pub mod dispatcher;
pub mod hierarchy;
pub mod locate;
pub mod render;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
