//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `codekit` command-line tool. Each subcommand is defined in its own file
//! to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` (and the output
//!   configuration) and performs the command's logic, calling into the
//!   `codekit` library for the core operations.

pub mod completions;
pub mod deps;
pub mod init;
pub mod list;
pub mod use_cmd;
