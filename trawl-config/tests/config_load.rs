use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use trawl_common::{FieldKind, Locator};
use trawl_config::{
    ConfigError, DetailSpec, ListingLayout, OutputConfig, TextSource, TrawlConfigLoader,
    BLOOMCARE, INDEED_UK,
};

fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn defaults_load_without_a_file() {
    let config = TrawlConfigLoader::new().load().expect("defaults load");

    let ids: Vec<_> = config.site_ids().collect();
    assert_eq!(ids, vec!["bloomcare", "indeed-uk", "indeed-uk-cards"]);

    let bloomcare = config.site(BLOOMCARE).unwrap();
    assert_eq!(bloomcare.parent_company.as_deref(), Some("BloomCare"));
    assert_eq!(bloomcare.details.len(), 2);
    assert_eq!(bloomcare.details[0].field(), FieldKind::Manager);
    assert_eq!(bloomcare.details[1].field(), FieldKind::ContactNumber);
    assert!(matches!(
        &bloomcare.output,
        OutputConfig::Xlsx { path } if path == &PathBuf::from("bloomcare_data.xlsx")
    ));

    assert_eq!(config.log_dir, None);

    let indeed = config.site(INDEED_UK).unwrap();
    assert!(matches!(indeed.listing, ListingLayout::Columns(_)));
    assert_eq!(indeed.output, OutputConfig::Console);
}

#[test]
#[serial]
fn file_overrides_site_and_expands_env() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
webdriver_url: "http://${TRAWL_TEST_GRID}:4444"
log_dir: "${TRAWL_TEST_OUT}/logs"
sites:
  - id: bloomcare
    listing_url: "https://www.carehome.co.uk/care_search_results.cfm/searchgroup/1"
    item_noun: carehome
    parent_company: BloomCare
    listing_timeout_secs: 5
    item_delay_ms: 0
    listing:
      layout: blocks
      container: { id: locations-content }
      item: { xpath: ".//div/header/div" }
      anchor: { css: a }
      name_from: { attr: title }
      location: { css: p }
    details:
      - kind: labelled_sibling
        field: manager
        marker: { css: ".profile-row-section" }
        label: { xpath: "//li[div[text()='Person in charge']]" }
        value: { xpath: "./following-sibling::li[1]" }
        cut_at: "("
    output:
      kind: xlsx
      path: "${TRAWL_TEST_OUT}/homes.xlsx"
"#;
    let p = write_yaml(&tmp, "trawl.yaml", file_yaml);

    let config = temp_env::with_vars(
        [
            ("TRAWL_TEST_GRID", Some("selenium")),
            ("TRAWL_TEST_OUT", Some("/srv/exports")),
        ],
        || TrawlConfigLoader::new().with_file(&p).load(),
    )
    .expect("load config");

    assert_eq!(config.webdriver_url, "http://selenium:4444");
    assert_eq!(config.log_dir, Some(PathBuf::from("/srv/exports/logs")));
    let site = config.site(BLOOMCARE).unwrap();
    assert_eq!(site.listing_timeout_secs, 5);
    assert_eq!(site.detail_timeout_secs, 20);
    assert_eq!(site.details.len(), 1);
    match &site.details[0] {
        DetailSpec::LabelledSibling { cut_at, value, .. } => {
            assert_eq!(cut_at.as_deref(), Some("("));
            assert_eq!(value, &Locator::xpath("./following-sibling::li[1]"));
        }
        other => panic!("expected labelled sibling, got {other:?}"),
    }
    match &site.listing {
        ListingLayout::Blocks(b) => assert_eq!(b.name_from, TextSource::Attr("title".into())),
        other => panic!("expected blocks layout, got {other:?}"),
    }
    assert!(matches!(
        &site.output,
        OutputConfig::Xlsx { path } if path == &PathBuf::from("/srv/exports/homes.xlsx")
    ));
    // untouched built-ins survive the overlay
    assert!(config.site(INDEED_UK).is_ok());
}

#[test]
#[serial]
fn environment_overrides_scalars() {
    let config = temp_env::with_vars(
        [
            ("TRAWL__HEADLESS", Some("true")),
            ("TRAWL__WEBDRIVER_URL", Some("http://127.0.0.1:4444")),
            ("TRAWL__LOG_DIR", Some("/var/log/trawl")),
        ],
        || TrawlConfigLoader::new().load(),
    )
    .expect("load config");

    assert!(config.headless);
    assert_eq!(config.webdriver_url, "http://127.0.0.1:4444");
    assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/trawl")));
}

#[test]
#[serial]
fn invalid_listing_url_is_rejected() {
    let err = TrawlConfigLoader::new()
        .with_yaml_str(
            r#"
sites:
  - id: broken
    listing_url: "not a url"
    listing:
      layout: columns
      marker: { css: ".jobTitle" }
      titles: { css: ".jobTitle" }
      locations: { css: "div.text_location" }
      links: { css: "h2 a" }
"#,
        )
        .load()
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidSite { site, .. } if site == "broken"));
}

#[test]
#[serial]
fn missing_required_file_fails() {
    let tmp = TempDir::new().unwrap();
    let err = TrawlConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));

    TrawlConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("optional file may be missing");
}
