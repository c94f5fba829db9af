//! Command-line front end for the contact ledger.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod file_scope;

pub use config::Config;
pub use dispatch::{dispatch, HandoffDispatch, StdoutOpener};
pub use file_scope::FileScope;
