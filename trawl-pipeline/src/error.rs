use trawl_drivers::DriverError;

use crate::sink::SinkError;

/// Failures that end a run.
///
/// Per-block and per-field problems never surface here; they are skipped or
/// replaced by sentinels where they happen.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("listing url `{url}` is invalid: {reason}")]
    ListingUrl { url: String, reason: String },

    #[error("listing page {url} did not load: {source}")]
    Listing {
        url: String,
        #[source]
        source: DriverError,
    },

    #[error("run interrupted")]
    Interrupted,

    #[error(transparent)]
    Sink(#[from] SinkError),
}
