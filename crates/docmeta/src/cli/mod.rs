//! CLI module for docmeta
//!
//! Every command is standalone: inputs come from files or the built-in
//! catalog, output goes to stdout as tables or JSON.

pub mod error;
pub mod output;

pub mod build;
pub mod builtins;
pub mod config;

pub use error::HelpfulError;
pub use output::print_table;
