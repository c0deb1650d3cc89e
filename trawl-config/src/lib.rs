//! Loader for trawl configuration: built-in site adapters, overlaid by an
//! optional YAML file, overlaid by `TRAWL__*` environment variables.
//!
//! Sites given in YAML replace the built-in site with the same `id`, or are
//! appended when the id is new. `${VAR}` placeholders anywhere in the merged
//! document are expanded before it is deserialized.
use config::{Config, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use url::Url;

mod presets;
mod site;

pub use presets::{BLOOMCARE, INDEED_UK, INDEED_UK_CARDS, builtin_sites};
pub use site::{
    BlockLayout, ColumnLabels, ColumnLayout, DetailSpec, Dismiss, ListingLayout, OutputConfig,
    RevealStep, SiteConfig, TextSource,
};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Decode(String),

    #[error("site `{site}`: {reason}")]
    InvalidSite { site: String, reason: String },

    #[error("invalid webdriver url `{0}`")]
    WebDriverUrl(String),

    #[error("unknown site `{0}`")]
    UnknownSite(String),
}

/// Fully merged configuration.
#[derive(Debug, Clone)]
pub struct TrawlConfig {
    pub webdriver_url: String,
    pub headless: bool,
    /// Browser window size as `(width, height)`.
    pub window_size: (u32, u32),
    /// Log directory. Unset means `TRAWL_LOG_DIR`, then `~/.local/share/trawl`.
    pub log_dir: Option<PathBuf>,
    pub sites: Vec<SiteConfig>,
}

impl Default for TrawlConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.into(),
            headless: false,
            window_size: (1920, 1200),
            log_dir: None,
            sites: builtin_sites(),
        }
    }
}

impl TrawlConfig {
    pub fn site(&self, id: &str) -> Result<&SiteConfig, ConfigError> {
        self.sites
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ConfigError::UnknownSite(id.to_string()))
    }

    pub fn site_ids(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(|s| s.id.as_str())
    }

    /// Check every option that would otherwise only fail mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.webdriver_url)
            .map_err(|_| ConfigError::WebDriverUrl(self.webdriver_url.clone()))?;

        for (i, site) in self.sites.iter().enumerate() {
            if self.sites[..i].iter().any(|s| s.id == site.id) {
                return Err(invalid(site, "duplicate site id"));
            }
            validate_site(site)?;
        }
        Ok(())
    }
}

fn invalid(site: &SiteConfig, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidSite {
        site: site.id.clone(),
        reason: reason.into(),
    }
}

fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    if site.id.trim().is_empty() {
        return Err(invalid(site, "id must not be empty"));
    }
    match Url::parse(&site.listing_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            return Err(invalid(
                site,
                format!("listing_url scheme `{}` is not http(s)", url.scheme()),
            ));
        }
        Err(e) => return Err(invalid(site, format!("listing_url: {e}"))),
    }
    if site.listing_timeout_secs == 0 || site.detail_timeout_secs == 0 {
        return Err(invalid(site, "timeouts must be at least one second"));
    }
    if let OutputConfig::Xlsx { path } = &site.output {
        if path.as_os_str().is_empty() {
            return Err(invalid(site, "output path must not be empty"));
        }
    }
    let empty_locator = match &site.listing {
        ListingLayout::Blocks(b) => [&b.container, &b.item, &b.anchor, &b.location]
            .iter()
            .any(|l| l.is_empty()),
        ListingLayout::Columns(c) => [&c.marker, &c.titles, &c.locations, &c.links]
            .iter()
            .any(|l| l.is_empty()),
    };
    if empty_locator {
        return Err(invalid(site, "listing locators must not be empty"));
    }
    Ok(())
}

/// Shape of the merged file + environment document. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Overlay {
    webdriver_url: Option<String>,
    headless: Option<bool>,
    window_size: Option<(u32, u32)>,
    log_dir: Option<PathBuf>,
    sites: Vec<SiteConfig>,
}

// Strings only; numbers and booleans pass through untouched.
fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Default location of the user config file (`~/.config/trawl/trawl.yaml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("trawl").join("trawl.yaml"))
}

/// Builder hiding the `config` crate wiring.
pub struct TrawlConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for TrawlConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TrawlConfigLoader {
    /// Built-in defaults plus `TRAWL__` environment overrides.
    ///
    /// ```
    /// use trawl_config::TrawlConfigLoader;
    ///
    /// let config = TrawlConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config.webdriver_url, "http://localhost:9515");
    /// assert!(config.site("bloomcare").is_ok());
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TRAWL")
                .separator("__")
                .try_parsing(true),
        );
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers the format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use trawl_config::TrawlConfigLoader;
    ///
    /// let cfg = TrawlConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// headless: true
    /// sites:
    ///   - id: bloomcare
    ///     listing_url: "https://example.com/search"
    ///     listing:
    ///       layout: blocks
    ///       container: { id: results }
    ///       item: { css: "div.card" }
    ///       anchor: { css: a }
    ///       location: { css: p }
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(cfg.headless);
    /// let site = cfg.site("bloomcare").unwrap();
    /// assert_eq!(site.listing_url, "https://example.com/search");
    /// assert!(site.details.is_empty());
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Build, expand `${VAR}` placeholders, merge onto the defaults and validate.
    pub fn load(self) -> Result<TrawlConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let overlay: Overlay =
            serde_json::from_value(v).map_err(|e| ConfigError::Decode(e.to_string()))?;

        let config = merge(TrawlConfig::default(), overlay);
        config.validate()?;
        Ok(config)
    }
}

fn merge(mut base: TrawlConfig, overlay: Overlay) -> TrawlConfig {
    if let Some(url) = overlay.webdriver_url {
        base.webdriver_url = url;
    }
    if let Some(headless) = overlay.headless {
        base.headless = headless;
    }
    if let Some(size) = overlay.window_size {
        base.window_size = size;
    }
    if overlay.log_dir.is_some() {
        base.log_dir = overlay.log_dir;
    }
    for site in overlay.sites {
        match base.sites.iter_mut().find(|s| s.id == site.id) {
            Some(existing) => *existing = site,
            None => base.sites.push(site),
        }
    }
    base
}
