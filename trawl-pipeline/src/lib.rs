//! The page-extraction pipeline.
//!
//! A run is listing → detail enrichment → progress report → sink, one item
//! at a time, all driven by a [`trawl_config::SiteConfig`]:
//!
//! - [`lister`]: listing page to ordered [`trawl_common::ListingStub`]s
//! - [`detail`]: per-field detail extraction with typed failures
//! - [`report`]: human-readable console progress
//! - [`sink`]: spreadsheet and console outputs
//! - [`pipeline`]: the runner tying them together
pub mod detail;
mod error;
pub mod lister;
pub mod pipeline;
pub mod report;
pub mod sink;

pub use error::PipelineError;
pub use pipeline::Pipeline;
