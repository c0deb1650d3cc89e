//! The browser seam used by the pipeline.
use async_trait::async_trait;
use std::time::Duration;
use trawl_common::Locator;

use crate::wait::poll_until;
use crate::DriverError;

pub mod chrome;

/// A DOM element handle.
#[async_trait]
pub trait PageElement: Clone + Send + Sync + Sized {
    /// All descendants matching `locator`, in document order.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, DriverError>;

    /// Visible text, as rendered.
    async fn text(&self) -> Result<String, DriverError>;

    /// Attribute value, `None` when the attribute is not set.
    async fn attr(&self, name: &str) -> Result<Option<String>, DriverError>;

    async fn is_displayed(&self) -> Result<bool, DriverError>;

    /// First descendant matching `locator`, without waiting.
    async fn find(&self, locator: &Locator) -> Result<Self, DriverError> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound(locator.clone()))
    }
}

/// One browser session, owned for the whole run.
///
/// [`Browser::close`] consumes the session, so teardown happens at most once.
#[async_trait]
pub trait Browser: Send + Sync + Sized {
    type Element: PageElement;

    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// All page elements matching `locator`, without waiting.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, DriverError>;

    /// Click through a script call, so overlays cannot intercept it.
    async fn click(&self, element: &Self::Element) -> Result<(), DriverError>;

    async fn close(self) -> Result<(), DriverError>;

    async fn find(&self, locator: &Locator) -> Result<Self::Element, DriverError> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound(locator.clone()))
    }

    /// Wait until an element matching `locator` is present.
    async fn wait_for(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Self::Element, DriverError> {
        poll_until(locator, timeout, || async move {
            Ok(self.find_all(locator).await?.into_iter().next())
        })
        .await
    }

    /// Wait until an element matching `locator` is present and displayed.
    async fn wait_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Self::Element, DriverError> {
        poll_until(locator, timeout, || async move {
            for element in self.find_all(locator).await? {
                // a stale handle just means the DOM moved under us; poll again
                if element.is_displayed().await.unwrap_or(false) {
                    return Ok(Some(element));
                }
            }
            Ok(None)
        })
        .await
    }

    /// Wait until nothing matching `locator` is displayed.
    async fn wait_hidden(&self, locator: &Locator, timeout: Duration) -> Result<(), DriverError> {
        poll_until(locator, timeout, || async move {
            for element in self.find_all(locator).await? {
                if element.is_displayed().await.unwrap_or(false) {
                    return Ok(None);
                }
            }
            Ok(Some(()))
        })
        .await
    }
}
