//! Built-in site adapters.
//!
//! The two job adapters read the same search page with different selector
//! sets. They are kept side by side rather than merged, since neither can be
//! confirmed as the current markup.
use crate::site::{
    BlockLayout, ColumnLabels, ColumnLayout, DetailSpec, Dismiss, ListingLayout, OutputConfig,
    RevealStep, SiteConfig, TextSource,
};
use trawl_common::{FieldKind, Locator};

pub const BLOOMCARE: &str = "bloomcare";
pub const INDEED_UK: &str = "indeed-uk";
pub const INDEED_UK_CARDS: &str = "indeed-uk-cards";

const INDEED_SEARCH: &str = "https://uk.indeed.com/jobs?q=python%20developer&l=london";

pub fn builtin_sites() -> Vec<SiteConfig> {
    vec![bloomcare(), indeed_uk(), indeed_uk_cards()]
}

fn bloomcare() -> SiteConfig {
    let profile = Locator::css(".profile-row-section");
    SiteConfig {
        id: BLOOMCARE.into(),
        listing_url: "https://www.carehome.co.uk/care_search_results.cfm/searchgroup/65432218733"
            .into(),
        item_noun: "carehome".into(),
        parent_company: Some("BloomCare".into()),
        columns: ColumnLabels {
            company: "Parent_Company".into(),
            name: "Business_Name".into(),
            location: "Location".into(),
            url: "URL".into(),
        },
        listing: ListingLayout::Blocks(BlockLayout {
            container: Locator::id("locations-content"),
            item: Locator::xpath(".//div/header/div"),
            anchor: Locator::css("a"),
            name_from: TextSource::Attr("title".into()),
            link_attr: "href".into(),
            location: Locator::css("p"),
            company: None,
        }),
        details: vec![
            DetailSpec::LabelledSibling {
                field: FieldKind::Manager,
                marker: profile.clone(),
                label: Locator::xpath("//li[div[text()='Person in charge']]"),
                value: Locator::xpath("./following-sibling::li[1]"),
                cut_at: Some("(".into()),
            },
            DetailSpec::Reveal {
                field: FieldKind::ContactNumber,
                marker: profile,
                steps: vec![
                    RevealStep::Click(Locator::id("brochure_phone")),
                    RevealStep::AwaitVisible(Locator::id("phone_modal")),
                    RevealStep::Click(Locator::css("label[for='enquiry_type_general']")),
                    RevealStep::AwaitVisible(Locator::id("telephone_enquiry")),
                ],
                target: Locator::css("#telephone_enquiry a[href^='tel:']"),
                dismiss: Some(Dismiss {
                    close: Locator::css("#ajaxModal button.close"),
                    hidden: Locator::id("ajaxModal"),
                }),
            },
        ],
        listing_timeout_secs: 30,
        detail_timeout_secs: 20,
        item_delay_ms: 2000,
        output: OutputConfig::Xlsx {
            path: "bloomcare_data.xlsx".into(),
        },
        progress: true,
        pause_before_exit: true,
    }
}

fn job_columns() -> ColumnLabels {
    ColumnLabels {
        company: "Company".into(),
        name: "Job name".into(),
        location: "Location".into(),
        url: "URL".into(),
    }
}

fn indeed_uk() -> SiteConfig {
    SiteConfig {
        id: INDEED_UK.into(),
        listing_url: INDEED_SEARCH.into(),
        item_noun: "job".into(),
        parent_company: None,
        columns: job_columns(),
        listing: ListingLayout::Columns(ColumnLayout {
            marker: Locator::css(".jobTitle"),
            titles: Locator::css(".jobTitle"),
            companies: Some(Locator::css("span.company_name")),
            locations: Locator::css("div.text_location"),
            links: Locator::xpath("//h2[contains(@class,\"jobTitle\")]/a"),
            link_attr: "href".into(),
        }),
        details: Vec::new(),
        listing_timeout_secs: 15,
        detail_timeout_secs: 20,
        item_delay_ms: 0,
        output: OutputConfig::Console,
        progress: false,
        pause_before_exit: false,
    }
}

fn indeed_uk_cards() -> SiteConfig {
    SiteConfig {
        id: INDEED_UK_CARDS.into(),
        listing_url: INDEED_SEARCH.into(),
        item_noun: "job".into(),
        parent_company: None,
        columns: job_columns(),
        listing: ListingLayout::Blocks(BlockLayout {
            container: Locator::id("mosaic-provider-jobcards"),
            item: Locator::css("div.job_seen_beacon"),
            anchor: Locator::css("h2.jobTitle a"),
            name_from: TextSource::Text,
            link_attr: "href".into(),
            location: Locator::css("[data-testid='text-location']"),
            company: Some(Locator::css("[data-testid='company-name']")),
        }),
        details: Vec::new(),
        listing_timeout_secs: 15,
        detail_timeout_secs: 20,
        item_delay_ms: 0,
        output: OutputConfig::Console,
        progress: false,
        pause_before_exit: false,
    }
}
