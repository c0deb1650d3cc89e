//! Driver layer for browser automation.
//!
//! Pipelines talk to the browser only through the [`Browser`] and
//! [`PageElement`] traits: open a URL, wait for an element, read text or an
//! attribute, click. The production backend drives Chrome over WebDriver.
//!
//! - [`browser::chrome::FantocciniBrowser`]: WebDriver client wrapper
//! - [`wait`]: condition polling with backoff inside a fixed budget
//! - `testing` (feature): in-memory browser for deterministic tests
pub mod browser;
mod error;
pub mod wait;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use browser::{Browser, PageElement};
pub use error::DriverError;
pub use trawl_common::Locator;
