//! Console progress for a run.
//!
//! This is user-facing output, written synchronously to the given writer.
//! Diagnostics go through `tracing` instead.
use std::io::Write;
use tracing::warn;
use trawl_common::{EnrichedRecord, FieldKind};
use trawl_config::SiteConfig;
use trawl_drivers::DriverError;

use crate::lister::SkippedBlock;
use crate::sink::{self, SinkOutcome};

const LABEL_WIDTH: usize = 17;
const RULE_WIDTH: usize = 60;
// Progress blocks leave the link out.
const URL_COLUMN: usize = 3;

pub struct Reporter<W: Write> {
    out: W,
    noun: String,
    header: Vec<String>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, site: &SiteConfig) -> Self {
        let mut header = sink::header(site);
        header.remove(URL_COLUMN);
        Self {
            out,
            noun: site.item_noun.clone(),
            header,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Progress block for the `index`-th (1-based) of `total` records.
    pub fn item(&mut self, index: usize, total: usize, record: &EnrichedRecord) {
        let mut block = format!(
            "\n--- Processing {} {index}/{total}: {} ---\n",
            self.noun, record.stub.name
        );
        for (label, value) in self.header.iter().zip(display_row(record)) {
            block.push_str(&format!("{label:<LABEL_WIDTH$}: {value}\n"));
        }
        block.push_str(&"-".repeat(RULE_WIDTH));
        self.emit(&block);
    }

    pub fn skipped(&mut self, skipped: &SkippedBlock) {
        let message = format!(
            " Skipping {} block #{}: {}",
            self.noun,
            skipped.index + 1,
            skipped.reason
        );
        self.emit(&message);
    }

    pub fn fallback(&mut self, name: &str, kind: FieldKind, error: &DriverError) {
        let message = format!(
            " {name}: {} unavailable ({error}); using \"{}\"",
            kind.label(),
            kind.sentinel()
        );
        self.emit(&message);
    }

    pub fn outcome(&mut self, outcome: &SinkOutcome) {
        self.emit(&outcome.to_string());
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            warn!(target: "pipeline.report", error = %e, "console write failed");
        }
    }
}

fn display_row(record: &EnrichedRecord) -> Vec<String> {
    let mut row = sink::row(record);
    row.remove(URL_COLUMN);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use trawl_common::ListingStub;
    use trawl_config::{BLOOMCARE, TrawlConfig};
    use url::Url;

    #[test]
    fn prints_carehome_progress_block() {
        let cfg = TrawlConfig::default();
        let site = cfg.site(BLOOMCARE).unwrap();
        let record = EnrichedRecord::new(
            ListingStub {
                source: BLOOMCARE.into(),
                name: "Rose Court".into(),
                location: "Leeds, LS1".into(),
                url: Url::parse("https://www.carehome.co.uk/carehome.cfm/searchazref/1").unwrap(),
                company: Some("BloomCare".into()),
            },
            vec![
                (FieldKind::Manager, "Jane Doe".into()),
                (
                    FieldKind::ContactNumber,
                    FieldKind::ContactNumber.sentinel().into(),
                ),
            ],
        );

        let mut reporter = Reporter::new(Vec::new(), site);
        reporter.item(1, 2, &record);
        let printed = String::from_utf8(reporter.into_inner()).unwrap();

        let rule = "-".repeat(60);
        let expected = [
            "",
            "--- Processing carehome 1/2: Rose Court ---",
            "Parent_Company   : BloomCare",
            "Business_Name    : Rose Court",
            "Location         : Leeds, LS1",
            "Manager          : Jane Doe",
            "Contact_Number   : Contact number not found",
            "Status           : Pending",
            rule.as_str(),
            "",
        ]
        .join("\n");
        assert_eq!(printed, expected);
    }
}
