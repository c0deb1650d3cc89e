use std::time::Duration;
use trawl_common::Locator;

/// Failure of a single browser primitive.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The condition did not hold within the wait budget.
    #[error("timed out after {timeout:?} waiting for {locator}")]
    Timeout { locator: Locator, timeout: Duration },

    /// An immediate lookup matched nothing.
    #[error("no element matches {0}")]
    NotFound(Locator),

    /// The WebDriver session rejected or failed a command.
    #[error("webdriver command failed: {0}")]
    Session(String),

    /// No session could be created.
    #[error("could not start browser session: {0}")]
    Connect(String),
}

impl DriverError {
    /// True for the "element is simply not there" outcomes.
    pub fn is_absent(&self) -> bool {
        matches!(self, DriverError::Timeout { .. } | DriverError::NotFound(_))
    }
}

impl From<fantoccini::error::CmdError> for DriverError {
    fn from(e: fantoccini::error::CmdError) -> Self {
        DriverError::Session(e.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for DriverError {
    fn from(e: fantoccini::error::NewSessionError) -> Self {
        DriverError::Connect(e.to_string())
    }
}
