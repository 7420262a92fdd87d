//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - worksheet cells and the per-stage quote records (`types`)
//! - run configuration (`SourceSpec`, `PaymentConfig`, `RunConfig`)
//! - money/number formatting shared by the narrative and the reports (`money`)

pub mod money;
pub mod types;

pub use money::*;
pub use types::*;
