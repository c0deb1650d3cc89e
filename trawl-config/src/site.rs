//! Site adapter schema: where a listing lives and how to read it.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use trawl_common::{FieldKind, Locator};

/// One scrape target. Every pipeline run is driven by exactly one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub id: String,
    pub listing_url: String,
    /// Word used in progress headers ("carehome", "job").
    #[serde(default = "default_item_noun")]
    pub item_noun: String,
    /// Fixed parent organisation stamped on every stub, when the listing
    /// itself does not carry a company.
    #[serde(default)]
    pub parent_company: Option<String>,
    #[serde(default)]
    pub columns: ColumnLabels,
    pub listing: ListingLayout,
    #[serde(default)]
    pub details: Vec<DetailSpec>,
    #[serde(default = "default_listing_timeout_secs")]
    pub listing_timeout_secs: u64,
    #[serde(default = "default_detail_timeout_secs")]
    pub detail_timeout_secs: u64,
    /// Courtesy pause between consecutive detail fetches.
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,
    #[serde(default)]
    pub output: OutputConfig,
    /// Print a progress block per item while the run is going.
    #[serde(default = "default_true")]
    pub progress: bool,
    /// Wait for ENTER before closing the browser at the end of a run.
    #[serde(default)]
    pub pause_before_exit: bool,
}

impl SiteConfig {
    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout_secs)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

/// Headers for the stub columns. Detail columns use [`FieldKind::label`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLabels {
    pub company: String,
    pub name: String,
    pub location: String,
    pub url: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            company: "Company".into(),
            name: "Name".into(),
            location: "Location".into(),
            url: "URL".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum ListingLayout {
    /// Items are self-contained blocks inside one container.
    Blocks(BlockLayout),
    /// Fields live in parallel page-wide element lists, zipped by position.
    Columns(ColumnLayout),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockLayout {
    /// Must appear within the listing timeout or the run aborts.
    pub container: Locator,
    /// Item blocks, looked up inside the container.
    pub item: Locator,
    /// Link carrying the name and the detail URL, inside a block.
    pub anchor: Locator,
    #[serde(default)]
    pub name_from: TextSource,
    #[serde(default = "default_link_attr")]
    pub link_attr: String,
    pub location: Locator,
    #[serde(default)]
    pub company: Option<Locator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub marker: Locator,
    pub titles: Locator,
    #[serde(default)]
    pub companies: Option<Locator>,
    pub locations: Locator,
    pub links: Locator,
    #[serde(default = "default_link_attr")]
    pub link_attr: String,
}

/// Where a value is read from on an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    #[default]
    Text,
    Attr(String),
}

/// How to pull one secondary field off a detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailSpec {
    /// Read the element next to a labelled one, e.g. the list item following
    /// "Person in charge".
    LabelledSibling {
        field: FieldKind,
        marker: Locator,
        label: Locator,
        /// Resolved relative to the label element.
        value: Locator,
        /// Keep only the text before this delimiter.
        #[serde(default)]
        cut_at: Option<String>,
    },
    /// Run a short click/wait script, then read the revealed text.
    Reveal {
        field: FieldKind,
        marker: Locator,
        steps: Vec<RevealStep>,
        target: Locator,
        #[serde(default)]
        dismiss: Option<Dismiss>,
    },
}

impl DetailSpec {
    pub fn field(&self) -> FieldKind {
        match self {
            DetailSpec::LabelledSibling { field, .. } | DetailSpec::Reveal { field, .. } => *field,
        }
    }

    pub fn marker(&self) -> &Locator {
        match self {
            DetailSpec::LabelledSibling { marker, .. } | DetailSpec::Reveal { marker, .. } => {
                marker
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealStep {
    Click(Locator),
    AwaitVisible(Locator),
}

/// Closing a modal after a reveal. Best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismiss {
    pub close: Locator,
    pub hidden: Locator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputConfig {
    Xlsx {
        path: PathBuf,
    },
    #[default]
    Console,
}

fn default_item_noun() -> String {
    "item".into()
}
fn default_link_attr() -> String {
    "href".into()
}
fn default_listing_timeout_secs() -> u64 {
    30
}
fn default_detail_timeout_secs() -> u64 {
    20
}
fn default_item_delay_ms() -> u64 {
    2000
}
fn default_true() -> bool {
    true
}
