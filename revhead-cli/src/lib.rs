//! # revhead CLI
//!
//! Command definitions and handlers for the `revhead` binary. The handlers
//! live in a library so they can be exercised without spawning a process.

pub mod cli;
