mod common;

use common::{HOME_ONE, HomeDetail, bloomcare, carehome_detail};
use trawl_common::FieldKind;
use trawl_drivers::testing::FakeBrowser;
use trawl_drivers::{DriverError, Locator};
use trawl_pipeline::detail::DetailExtractor;
use url::Url;

fn home_url() -> Url {
    Url::parse(HOME_ONE).unwrap()
}

#[tokio::test(start_paused = true)]
async fn reads_manager_and_revealed_number() {
    let site = bloomcare();
    let browser = FakeBrowser::new().with_page(HOME_ONE, carehome_detail(HomeDetail::default()));

    let fields = DetailExtractor::new(&browser, site.detail_timeout())
        .extract(&home_url(), &site.details)
        .await;

    assert_eq!(fields[0].0, FieldKind::Manager);
    assert_eq!(fields[0].1.as_deref().unwrap(), "Jane Doe");
    assert_eq!(fields[1].0, FieldKind::ContactNumber);
    assert_eq!(fields[1].1.as_deref().unwrap(), "0113 496 0000");

    assert_eq!(
        browser.clicks(),
        vec![
            Locator::id("brochure_phone"),
            Locator::css("label[for='enquiry_type_general']"),
            Locator::css("#ajaxModal button.close"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn absent_manager_stays_on_detail_page() {
    let site = bloomcare();
    let browser = FakeBrowser::new().with_page(
        HOME_ONE,
        carehome_detail(HomeDetail {
            manager: None,
            ..HomeDetail::default()
        }),
    );

    let fields = DetailExtractor::new(&browser, site.detail_timeout())
        .extract(&home_url(), &site.details)
        .await;

    assert!(matches!(fields[0].1, Err(DriverError::Timeout { .. })));
    assert_eq!(fields[1].1.as_deref().unwrap(), "0113 496 0000");

    let visits = browser.visits();
    assert!(!visits.is_empty());
    assert!(visits.iter().all(|v| v == HOME_ONE));
}

#[tokio::test(start_paused = true)]
async fn failed_reveal_leaves_manager_alone() {
    let site = bloomcare();
    let browser = FakeBrowser::new().with_page(
        HOME_ONE,
        carehome_detail(HomeDetail {
            phone_button: false,
            ..HomeDetail::default()
        }),
    );

    let fields = DetailExtractor::new(&browser, site.detail_timeout())
        .extract(&home_url(), &site.details)
        .await;

    assert_eq!(fields[0].1.as_deref().unwrap(), "Jane Doe");
    match &fields[1].1 {
        Err(DriverError::Timeout { locator, .. }) => {
            assert_eq!(locator, &Locator::id("brochure_phone"))
        }
        other => panic!("expected reveal timeout, got {other:?}"),
    }
    assert!(browser.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn modal_that_will_not_close_keeps_number() {
    let site = bloomcare();
    let browser = FakeBrowser::new().with_page(
        HOME_ONE,
        carehome_detail(HomeDetail {
            close_button: false,
            ..HomeDetail::default()
        }),
    );

    let fields = DetailExtractor::new(&browser, site.detail_timeout())
        .extract(&home_url(), &site.details)
        .await;

    assert_eq!(fields[1].1.as_deref().unwrap(), "0113 496 0000");
}
