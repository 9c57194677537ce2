//! Hidden gem filter: score coins by hand with a weighted 1-5 scorecard or a
//! six-stage yes/no pipeline, keep the session's rows in memory, and export
//! them as CSV.

pub mod browser;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod session;
pub mod stderr_buffer;
pub mod tui;

pub use error::ValidationError;
