//! Extraction core for rstextract.
//!
//! - [`marker`] decides whether a comment block is payload
//! - [`order`] fixes the order of files inside a compilation unit
//! - [`extract`] turns one unit into its ordered payloads
//! - [`pipeline`] drives a whole run from source directory to documents

pub mod extract;
pub mod marker;
pub mod order;
pub mod pipeline;

pub use extract::{extract_unit, render_document};
pub use marker::Marker;
pub use order::{Tier, order_files};
pub use pipeline::{
    ExtractConfig, ExtractReport, ProgressReporter, SilentProgress, WriteFailure, WrittenDoc, run,
};
