//! Runs one site adapter end to end: list, enrich each item, report, sink.
use std::io::Write;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span};
use trawl_common::{EnrichedRecord, ListingStub, Status};
use trawl_config::SiteConfig;
use trawl_drivers::Browser;
use uuid::Uuid;

use crate::PipelineError;
use crate::detail::DetailExtractor;
use crate::lister::Lister;
use crate::report::Reporter;
use crate::sink::{self, Sink, SinkOutcome};

pub struct Pipeline<'a, B: Browser, W: Write> {
    browser: &'a B,
    site: &'a SiteConfig,
    reporter: Reporter<W>,
}

impl<'a, B: Browser, W: Write> Pipeline<'a, B, W> {
    pub fn new(browser: &'a B, site: &'a SiteConfig, reporter: Reporter<W>) -> Self {
        Self {
            browser,
            site,
            reporter,
        }
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }

    /// List and enrich every item. Items are processed strictly in order.
    ///
    /// Cancelling `cancel` stops the run at the next item boundary or during
    /// the courtesy delay and yields [`PipelineError::Interrupted`].
    pub async fn run(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Vec<EnrichedRecord>, PipelineError> {
        let span = info_span!("run", site = %self.site.id, run_id = %Uuid::new_v4());
        self.run_inner(cancel).instrument(span).await
    }

    /// [`Pipeline::run`], then hand the records to `sink` and announce the result.
    pub async fn run_to_sink(
        &mut self,
        sink: &mut dyn Sink,
        cancel: &CancellationToken,
    ) -> Result<SinkOutcome, PipelineError> {
        let records = self.run(cancel).await?;
        let outcome = sink.write(&sink::header(self.site), &records)?;
        self.reporter.outcome(&outcome);
        Ok(outcome)
    }

    async fn run_inner(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Vec<EnrichedRecord>, PipelineError> {
        let lister = Lister::new(self.browser, self.site);
        let listing = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Interrupted),
            listing = lister.list() => listing?,
        };
        for skipped in &listing.skipped {
            self.reporter.skipped(skipped);
        }

        let total = listing.stubs.len();
        let has_details = !self.site.details.is_empty();
        let mut records = Vec::with_capacity(total);

        for (i, stub) in listing.stubs.into_iter().enumerate() {
            let record = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PipelineError::Interrupted),
                record = self.enrich(stub) => record,
            };

            if self.site.progress {
                self.reporter.item(i + 1, total, &record);
            }
            records.push(record);

            if has_details && i + 1 < total {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(PipelineError::Interrupted),
                    _ = sleep(self.site.item_delay()) => {}
                }
            }
        }

        info!(target: "pipeline", records = records.len(), "run complete");
        Ok(records)
    }

    async fn enrich(&mut self, stub: ListingStub) -> EnrichedRecord {
        let extractor = DetailExtractor::new(self.browser, self.site.detail_timeout());
        let extracted = extractor.extract(&stub.url, &self.site.details).await;

        let mut fields = Vec::with_capacity(extracted.len());
        for (kind, result) in extracted {
            let value = match result {
                Ok(value) => value,
                Err(e) => {
                    self.reporter.fallback(&stub.name, kind, &e);
                    kind.sentinel().to_string()
                }
            };
            fields.push((kind, value));
        }

        let mut record = EnrichedRecord::new(stub, fields);
        record.status = Status::Pending;
        record
    }
}
