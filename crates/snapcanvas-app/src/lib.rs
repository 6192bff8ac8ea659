//! SnapCanvas command-line shell.
//!
//! Loads document payloads, renders their panels through the editor and
//! moves documents in and out of the file store.

mod cli;
mod commands;

pub use cli::{Cli, Command};
pub use commands::{AppError, AppResult, Summary, render, run};
