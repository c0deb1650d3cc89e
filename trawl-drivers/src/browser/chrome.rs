use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{debug, info};
use trawl_common::Locator;
use webdriver::capabilities::Capabilities;

use crate::browser::{Browser, PageElement};
use crate::DriverError;

/// How to reach the WebDriver endpoint and shape the Chrome window.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// e.g. `http://localhost:9515` for a local chromedriver.
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: false,
            window_size: (1920, 1200),
        }
    }
}

/// Chrome command-line arguments for `options`.
pub fn chrome_arguments(options: &BrowserOptions) -> Vec<String> {
    let (width, height) = options.window_size;
    let mut args = vec![
        format!("--window-size={width},{height}"),
        "--disable-dev-shm-usage".to_string(),
    ];
    if options.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

fn to_webdriver(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator {
        Locator::Css(s) => fantoccini::Locator::Css(s),
        Locator::XPath(s) => fantoccini::Locator::XPath(s),
        Locator::Id(s) => fantoccini::Locator::Id(s),
    }
}

/// [`Browser`] backed by a `fantoccini` WebDriver client.
pub struct FantocciniBrowser {
    client: Client,
}

impl FantocciniBrowser {
    /// Open a new Chrome session on the configured WebDriver endpoint.
    pub async fn connect(options: &BrowserOptions) -> Result<Self, DriverError> {
        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": chrome_arguments(options) }),
        );

        info!(
            target: "browser.driver",
            endpoint = %options.webdriver_url,
            headless = options.headless,
            "starting browser session"
        );
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Browser for FantocciniBrowser {
    type Element = FantocciniElement;

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        debug!(target: "browser.driver", %url, "navigating");
        self.client.goto(url).await?;
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<FantocciniElement>, DriverError> {
        let elements = self.client.find_all(to_webdriver(locator)).await?;
        Ok(elements.into_iter().map(FantocciniElement::new).collect())
    }

    async fn click(&self, element: &FantocciniElement) -> Result<(), DriverError> {
        let arg = serde_json::to_value(&element.element)
            .map_err(|e| DriverError::Session(format!("cannot pass element to script: {e}")))?;
        self.client
            .execute("arguments[0].click();", vec![arg])
            .await?;
        Ok(())
    }

    async fn close(self) -> Result<(), DriverError> {
        info!(target: "browser.driver", "closing browser session");
        self.client.close().await?;
        Ok(())
    }
}

/// Element handle returned by [`FantocciniBrowser`].
#[derive(Clone)]
pub struct FantocciniElement {
    element: Element,
}

impl FantocciniElement {
    fn new(element: Element) -> Self {
        Self { element }
    }
}

#[async_trait]
impl PageElement for FantocciniElement {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, DriverError> {
        let elements = self.element.find_all(to_webdriver(locator)).await?;
        Ok(elements.into_iter().map(FantocciniElement::new).collect())
    }

    async fn text(&self) -> Result<String, DriverError> {
        Ok(self.element.text().await?)
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self.element.attr(name).await?)
    }

    async fn is_displayed(&self) -> Result<bool, DriverError> {
        Ok(self.element.is_displayed().await?)
    }
}
