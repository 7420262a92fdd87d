//! Terminal plotting.

pub mod bars;

pub use bars::*;
