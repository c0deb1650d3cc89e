//! Fake carehome and job-board pages shaped like the built-in adapters expect.
#![allow(dead_code)]

use trawl_config::{BLOOMCARE, SiteConfig, TrawlConfig};
use trawl_drivers::Locator;
use trawl_drivers::testing::{ClickEffect, FakeBrowser, FakeElement, FakePage};

pub const HOME_ONE: &str = "https://www.carehome.co.uk/carehome.cfm/searchazref/1";
pub const HOME_TWO: &str = "https://www.carehome.co.uk/carehome.cfm/searchazref/2";

pub fn site(id: &str) -> SiteConfig {
    TrawlConfig::default()
        .site(id)
        .expect("built-in site")
        .clone()
}

pub fn bloomcare() -> SiteConfig {
    site(BLOOMCARE)
}

pub fn home_block(title: &str, href: &str, location: &str) -> FakeElement {
    FakeElement::new()
        .with_child(
            Locator::css("a"),
            FakeElement::new()
                .with_attr("title", title)
                .with_attr("href", href),
        )
        .with_child(Locator::css("p"), FakeElement::new().with_text(location))
}

/// A listing page with the given blocks under the results container.
pub fn carehome_listing(blocks: Vec<FakeElement>) -> FakePage {
    let container = blocks.into_iter().fold(FakeElement::new(), |c, block| {
        c.with_child(Locator::xpath(".//div/header/div"), block)
    });
    FakePage::new().with(Locator::id("locations-content"), container)
}

pub struct HomeDetail {
    pub manager: Option<&'static str>,
    pub phone_button: bool,
    pub phone: &'static str,
    pub close_button: bool,
}

impl Default for HomeDetail {
    fn default() -> Self {
        Self {
            manager: Some("Jane Doe (Registered Manager)"),
            phone_button: true,
            phone: " 0113 496 0000 ",
            close_button: true,
        }
    }
}

/// A carehome detail page. The phone number sits behind two modal clicks.
pub fn carehome_detail(detail: HomeDetail) -> FakePage {
    let general = Locator::css("label[for='enquiry_type_general']");
    let mut page = FakePage::new()
        .with(Locator::css(".profile-row-section"), FakeElement::new())
        .with(Locator::id("ajaxModal"), FakeElement::new())
        .on_click(
            Locator::id("brochure_phone"),
            ClickEffect::new()
                .show(Locator::id("phone_modal"), FakeElement::new())
                .show(general.clone(), FakeElement::new().with_text("General")),
        )
        .on_click(
            general,
            ClickEffect::new()
                .show(Locator::id("telephone_enquiry"), FakeElement::new())
                .show(
                    Locator::css("#telephone_enquiry a[href^='tel:']"),
                    FakeElement::new().with_text(detail.phone),
                ),
        )
        .on_click(
            Locator::css("#ajaxModal button.close"),
            ClickEffect::new().remove(Locator::id("ajaxModal")),
        );

    if let Some(manager) = detail.manager {
        page = page.with(
            Locator::xpath("//li[div[text()='Person in charge']]"),
            FakeElement::new().with_child(
                Locator::xpath("./following-sibling::li[1]"),
                FakeElement::new().with_text(manager),
            ),
        );
    }
    if detail.phone_button {
        page = page.with(
            Locator::id("brochure_phone"),
            FakeElement::new().with_text("Call"),
        );
    }
    if detail.close_button {
        page = page.with(
            Locator::css("#ajaxModal button.close"),
            FakeElement::new(),
        );
    }
    page
}

/// Listing with two homes, both with complete detail pages.
pub fn two_homes(site: &SiteConfig) -> FakeBrowser {
    FakeBrowser::new()
        .with_page(
            site.listing_url.as_str(),
            carehome_listing(vec![
                home_block("Rose Court", "/carehome.cfm/searchazref/1", " Leeds, LS1 "),
                home_block("Oak Lodge", "/carehome.cfm/searchazref/2", "York, YO1"),
            ]),
        )
        .with_page(HOME_ONE, carehome_detail(HomeDetail::default()))
        .with_page(
            HOME_TWO,
            carehome_detail(HomeDetail {
                manager: Some("Sam Roe"),
                phone: "01904 000000",
                ..HomeDetail::default()
            }),
        )
}
