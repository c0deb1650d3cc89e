use serde::{Deserialize, Serialize};
use std::fmt;

/// Element locator understood by every browser backend.
///
/// Serialized externally tagged, so site adapters read as
/// `{ css: "#locations-content" }` or `{ xpath: ".//div/header/div" }`.
/// Class-name and tag-name lookups are expressed as CSS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    Css(String),
    #[serde(rename = "xpath")]
    XPath(String),
    Id(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    /// The raw selector, expression or id.
    pub fn value(&self) -> &str {
        match self {
            Locator::Css(s) | Locator::XPath(s) | Locator::Id(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value().trim().is_empty()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::XPath(s) => write!(f, "xpath `{s}`"),
            Locator::Id(s) => write!(f, "id `{s}`"),
        }
    }
}
