//! Command implementations for the devloop CLI.
//!
//! - [`serve`] - the development server lifecycle (default command)
//! - [`check`] - configuration validation
//!
//! Each command provides an `execute` function that takes the parsed
//! arguments and returns a Result.

pub mod check;
pub mod serve;

pub use check::execute as check_execute;
pub use serve::execute as serve_execute;
