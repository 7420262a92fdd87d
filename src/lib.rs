//! `freight-score` library crate.
//!
//! The binary (`freight`) is a thin wrapper around this library so that:
//!
//! - loading, scoring and narrative logic is testable without spawning processes
//! - the CLI report and the TUI dashboard share one pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod narrative;
pub mod plot;
pub mod report;
pub mod scoring;
pub mod telemetry;
pub mod terms;
pub mod tui;
