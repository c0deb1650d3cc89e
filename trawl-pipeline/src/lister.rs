//! Listing page → ordered [`ListingStub`]s.
//!
//! Only the first results page is read. A missing listing container aborts
//! the run; a malformed block is skipped and recorded in
//! [`Listing::skipped`].
use tracing::{info, warn};
use trawl_common::{ListingStub, Locator};
use trawl_config::{BlockLayout, ColumnLayout, ListingLayout, SiteConfig, TextSource};
use trawl_drivers::{Browser, DriverError, PageElement};
use url::Url;

use crate::PipelineError;

/// Why a single block or row was left out.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("missing `{0}` attribute")]
    MissingAttribute(String),

    #[error("link `{href}` cannot be resolved: {reason}")]
    BadLink { href: String, reason: String },
}

#[derive(Debug)]
pub struct SkippedBlock {
    /// Zero-based position on the page.
    pub index: usize,
    pub reason: BlockError,
}

#[derive(Debug, Default)]
pub struct Listing {
    pub stubs: Vec<ListingStub>,
    pub skipped: Vec<SkippedBlock>,
}

impl Listing {
    fn push(&mut self, index: usize, read: Result<ListingStub, BlockError>) {
        match read {
            Ok(stub) => self.stubs.push(stub),
            Err(reason) => {
                warn!(target: "pipeline.lister", index, %reason, "skipping listing block");
                self.skipped.push(SkippedBlock { index, reason });
            }
        }
    }
}

pub struct Lister<'a, B: Browser> {
    browser: &'a B,
    site: &'a SiteConfig,
}

impl<'a, B: Browser> Lister<'a, B> {
    pub fn new(browser: &'a B, site: &'a SiteConfig) -> Self {
        Self { browser, site }
    }

    pub async fn list(&self) -> Result<Listing, PipelineError> {
        let url = &self.site.listing_url;
        let base = Url::parse(url).map_err(|e| PipelineError::ListingUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        info!(target: "pipeline.lister", site = %self.site.id, %url, "loading listing page");
        self.browser.goto(url).await.map_err(|e| self.fatal(e))?;

        let listing = match &self.site.listing {
            ListingLayout::Blocks(layout) => self.list_blocks(&base, layout).await?,
            ListingLayout::Columns(layout) => self.list_columns(&base, layout).await?,
        };

        info!(
            target: "pipeline.lister",
            found = listing.stubs.len(),
            skipped = listing.skipped.len(),
            "listing read"
        );
        Ok(listing)
    }

    fn fatal(&self, source: DriverError) -> PipelineError {
        PipelineError::Listing {
            url: self.site.listing_url.clone(),
            source,
        }
    }

    async fn list_blocks(&self, base: &Url, layout: &BlockLayout) -> Result<Listing, PipelineError> {
        let container = self
            .browser
            .wait_for(&layout.container, self.site.listing_timeout())
            .await
            .map_err(|e| self.fatal(e))?;
        let blocks = container
            .find_all(&layout.item)
            .await
            .map_err(|e| self.fatal(e))?;

        let mut listing = Listing::default();
        for (index, block) in blocks.iter().enumerate() {
            listing.push(index, self.read_block(base, layout, block).await);
        }
        Ok(listing)
    }

    async fn read_block(
        &self,
        base: &Url,
        layout: &BlockLayout,
        block: &B::Element,
    ) -> Result<ListingStub, BlockError> {
        let anchor = block.find(&layout.anchor).await?;
        let name = read_source(&anchor, &layout.name_from).await?;
        let href = required_attr(&anchor, &layout.link_attr).await?;
        let location = read_text(block, &layout.location).await?;
        let company = match &layout.company {
            Some(locator) => optional_text(block, locator).await?,
            None => None,
        };

        Ok(ListingStub {
            source: self.site.id.clone(),
            name,
            location,
            url: resolve(base, &href)?,
            company: company.or_else(|| self.site.parent_company.clone()),
        })
    }

    async fn list_columns(
        &self,
        base: &Url,
        layout: &ColumnLayout,
    ) -> Result<Listing, PipelineError> {
        self.browser
            .wait_for(&layout.marker, self.site.listing_timeout())
            .await
            .map_err(|e| self.fatal(e))?;

        let titles = self.column(&layout.titles).await?;
        let locations = self.column(&layout.locations).await?;
        let links = self.column(&layout.links).await?;
        let companies = match &layout.companies {
            Some(locator) => Some(self.column(locator).await?),
            None => None,
        };

        // positions pair up only as far as the shortest column reaches
        let rows = [
            titles.len(),
            locations.len(),
            links.len(),
            companies.as_ref().map_or(usize::MAX, Vec::len),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);

        let mut listing = Listing::default();
        for index in 0..rows {
            let company = companies.as_ref().map(|c| &c[index]);
            let read = self
                .read_row(base, layout, &titles[index], company, &locations[index], &links[index])
                .await;
            listing.push(index, read);
        }
        Ok(listing)
    }

    async fn column(&self, locator: &Locator) -> Result<Vec<B::Element>, PipelineError> {
        self.browser
            .find_all(locator)
            .await
            .map_err(|e| self.fatal(e))
    }

    async fn read_row(
        &self,
        base: &Url,
        layout: &ColumnLayout,
        title: &B::Element,
        company: Option<&B::Element>,
        location: &B::Element,
        link: &B::Element,
    ) -> Result<ListingStub, BlockError> {
        let name = title.text().await?.trim().to_string();
        let company = match company {
            Some(el) => Some(el.text().await?.trim().to_string()),
            None => self.site.parent_company.clone(),
        };
        let location = location.text().await?.trim().to_string();
        let href = required_attr(link, &layout.link_attr).await?;

        Ok(ListingStub {
            source: self.site.id.clone(),
            name,
            location,
            url: resolve(base, &href)?,
            company,
        })
    }
}

async fn read_text<E: PageElement>(parent: &E, locator: &Locator) -> Result<String, BlockError> {
    Ok(parent.find(locator).await?.text().await?.trim().to_string())
}

/// Like [`read_text`], but a missing element is `None` rather than an error.
async fn optional_text<E: PageElement>(
    parent: &E,
    locator: &Locator,
) -> Result<Option<String>, BlockError> {
    match parent.find(locator).await {
        Ok(el) => Ok(Some(el.text().await?.trim().to_string())),
        Err(DriverError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn read_source<E: PageElement>(el: &E, source: &TextSource) -> Result<String, BlockError> {
    match source {
        TextSource::Text => Ok(el.text().await?.trim().to_string()),
        TextSource::Attr(name) => required_attr(el, name).await,
    }
}

async fn required_attr<E: PageElement>(el: &E, name: &str) -> Result<String, BlockError> {
    el.attr(name)
        .await?
        .map(|v| v.trim().to_string())
        .ok_or_else(|| BlockError::MissingAttribute(name.to_string()))
}

fn resolve(base: &Url, href: &str) -> Result<Url, BlockError> {
    base.join(href).map_err(|e| BlockError::BadLink {
        href: href.to_string(),
        reason: e.to_string(),
    })
}
