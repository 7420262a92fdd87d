//! Input/output helpers.
//!
//! - source path resolution (`source`)
//! - worksheet access via `calamine` (`workbook`)
//! - ingest, cleaning and join (`ingest`)
//! - memoized loads (`cache`)
//! - ranked-result exports (CSV/JSON) (`export`)

pub mod cache;
pub mod export;
pub mod ingest;
pub mod source;
pub mod workbook;

pub use cache::*;
pub use export::*;
pub use ingest::*;
pub use source::*;
pub use workbook::*;
