//! Deterministic in-memory [`Browser`] for tests.
//!
//! Pages are registered by URL and hold element trees keyed by the exact
//! [`Locator`] the code under test will ask for; no selector is evaluated.
//! Clicks can reveal or remove elements, which is enough to script modal
//! interactions. Unknown URLs load as an empty page.
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use trawl_common::Locator;

use crate::{Browser, DriverError, PageElement};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    text: String,
    attrs: HashMap<String, String>,
    children: HashMap<Locator, Vec<FakeElement>>,
    hidden: bool,
    /// Page-level locator this handle was found through; clicks key on it.
    origin: Option<Locator>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, locator: Locator, child: FakeElement) -> Self {
        self.children.entry(locator).or_default().push(child);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[async_trait]
impl PageElement for FakeElement {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, DriverError> {
        Ok(self.children.get(locator).cloned().unwrap_or_default())
    }

    async fn text(&self) -> Result<String, DriverError> {
        Ok(self.text.clone())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn is_displayed(&self) -> Result<bool, DriverError> {
        Ok(!self.hidden)
    }
}

/// What clicking an element does to the live page.
#[derive(Debug, Clone, Default)]
pub struct ClickEffect {
    show: Vec<(Locator, FakeElement)>,
    remove: Vec<Locator>,
}

impl ClickEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `element` findable under `locator`, replacing what was there.
    pub fn show(mut self, locator: Locator, element: FakeElement) -> Self {
        self.show.push((locator, element));
        self
    }

    pub fn remove(mut self, locator: Locator) -> Self {
        self.remove.push(locator);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: HashMap<Locator, Vec<FakeElement>>,
    on_click: HashMap<Locator, ClickEffect>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: Locator, element: FakeElement) -> Self {
        self.elements.entry(locator).or_default().push(element);
        self
    }

    pub fn with_all(mut self, locator: Locator, elements: Vec<FakeElement>) -> Self {
        self.elements.entry(locator).or_default().extend(elements);
        self
    }

    pub fn on_click(mut self, locator: Locator, effect: ClickEffect) -> Self {
        self.on_click.insert(locator, effect);
        self
    }
}

#[derive(Debug, Default)]
struct FakeState {
    pages: HashMap<String, FakePage>,
    live: FakePage,
    visits: Vec<String>,
    clicks: Vec<Locator>,
    closed: bool,
}

/// Cloneable handle; clones share one session so a test can keep a handle
/// after moving the browser into the code under test.
#[derive(Debug, Clone, Default)]
pub struct FakeBrowser {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: impl Into<String>, page: FakePage) -> Self {
        self.state().pages.insert(url.into(), page);
        self
    }

    /// Every URL passed to `goto`, in order.
    pub fn visits(&self) -> Vec<String> {
        self.state().visits.clone()
    }

    /// Origin locator of every clicked element, in order.
    pub fn clicks(&self) -> Vec<Locator> {
        self.state().clicks.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(state: &FakeState) -> Result<(), DriverError> {
        if state.closed {
            return Err(DriverError::Session("session already closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state();
        Self::ensure_open(&state)?;
        state.visits.push(url.to_string());
        state.live = state.pages.get(url).cloned().unwrap_or_default();
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>, DriverError> {
        let state = self.state();
        Self::ensure_open(&state)?;
        let found = state
            .live
            .elements
            .get(locator)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|mut el| {
                el.origin = Some(locator.clone());
                el
            })
            .collect();
        Ok(found)
    }

    async fn click(&self, element: &FakeElement) -> Result<(), DriverError> {
        let mut state = self.state();
        Self::ensure_open(&state)?;
        let Some(origin) = element.origin.clone() else {
            return Ok(());
        };
        state.clicks.push(origin.clone());
        if let Some(effect) = state.live.on_click.get(&origin).cloned() {
            for locator in effect.remove {
                state.live.elements.remove(&locator);
            }
            for (locator, el) in effect.show {
                state.live.elements.insert(locator, vec![el]);
            }
        }
        Ok(())
    }

    async fn close(self) -> Result<(), DriverError> {
        let mut state = self.state();
        Self::ensure_open(&state)?;
        state.closed = true;
        Ok(())
    }
}
