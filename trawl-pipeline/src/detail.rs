//! Detail page → secondary fields.
//!
//! Each [`DetailSpec`] is extracted on its own: it navigates to the detail
//! URL, waits for its marker and returns a typed result. A failure stays
//! confined to that field; callers decide what to substitute.
use std::time::Duration;
use tracing::{debug, info, warn};
use trawl_common::{FieldKind, Locator};
use trawl_config::{DetailSpec, Dismiss, RevealStep};
use trawl_drivers::{Browser, DriverError, PageElement};
use url::Url;

pub type FieldResult = Result<String, DriverError>;

pub struct DetailExtractor<'a, B: Browser> {
    browser: &'a B,
    timeout: Duration,
}

impl<'a, B: Browser> DetailExtractor<'a, B> {
    pub fn new(browser: &'a B, timeout: Duration) -> Self {
        Self { browser, timeout }
    }

    /// One result per [`DetailSpec`], in the order given.
    pub async fn extract(&self, url: &Url, specs: &[DetailSpec]) -> Vec<(FieldKind, FieldResult)> {
        let mut fields = Vec::with_capacity(specs.len());
        for spec in specs {
            let result = self.extract_field(url, spec).await;
            match &result {
                Err(e) if e.is_absent() => info!(
                    target: "pipeline.detail",
                    %url,
                    field = spec.field().label(),
                    error = %e,
                    "field not on page"
                ),
                Err(e) => warn!(
                    target: "pipeline.detail",
                    %url,
                    field = spec.field().label(),
                    error = %e,
                    "field extraction failed"
                ),
                Ok(_) => {}
            }
            fields.push((spec.field(), result));
        }
        fields
    }

    pub async fn extract_field(&self, url: &Url, spec: &DetailSpec) -> FieldResult {
        self.browser.goto(url.as_str()).await?;
        self.browser.wait_for(spec.marker(), self.timeout).await?;

        match spec {
            DetailSpec::LabelledSibling {
                label,
                value,
                cut_at,
                ..
            } => self.labelled_sibling(label, value, cut_at.as_deref()).await,
            DetailSpec::Reveal {
                steps,
                target,
                dismiss,
                ..
            } => self.reveal(steps, target, dismiss.as_ref()).await,
        }
    }

    async fn labelled_sibling(
        &self,
        label: &Locator,
        value: &Locator,
        cut_at: Option<&str>,
    ) -> FieldResult {
        let labelled = self.browser.wait_for(label, self.timeout).await?;
        let text = labelled.find(value).await?.text().await?;
        Ok(cut_text(&text, cut_at))
    }

    async fn reveal(
        &self,
        steps: &[RevealStep],
        target: &Locator,
        dismiss: Option<&Dismiss>,
    ) -> FieldResult {
        for step in steps {
            debug!(target: "pipeline.detail", ?step, "reveal step");
            match step {
                RevealStep::Click(locator) => {
                    let el = self.browser.wait_visible(locator, self.timeout).await?;
                    self.browser.click(&el).await?;
                }
                RevealStep::AwaitVisible(locator) => {
                    self.browser.wait_visible(locator, self.timeout).await?;
                }
            }
        }

        let text = self
            .browser
            .wait_for(target, self.timeout)
            .await?
            .text()
            .await?
            .trim()
            .to_string();

        if let Some(dismiss) = dismiss {
            if let Err(e) = self.dismiss(dismiss).await {
                debug!(target: "pipeline.detail", error = %e, "modal left open");
            }
        }
        Ok(text)
    }

    async fn dismiss(&self, dismiss: &Dismiss) -> Result<(), DriverError> {
        let close = self.browser.find(&dismiss.close).await?;
        self.browser.click(&close).await?;
        self.browser.wait_hidden(&dismiss.hidden, self.timeout).await
    }
}

/// Trim, and keep only what precedes `cut_at` when given.
fn cut_text(text: &str, cut_at: Option<&str>) -> String {
    let kept = match cut_at {
        Some(delim) if !delim.is_empty() => text.split(delim).next().unwrap_or(text),
        _ => text,
    };
    kept.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_role_suffix() {
        assert_eq!(
            cut_text("  Jane Doe (Registered Manager) ", Some("(")),
            "Jane Doe"
        );
        assert_eq!(cut_text("Jane Doe", Some("(")), "Jane Doe");
        assert_eq!(cut_text(" Jane (x) ", None), "Jane (x)");
    }
}
