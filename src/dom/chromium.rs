//! Chromium-backed `Document` using chromiumoxide.
//!
//! Element reads that chromiumoxide has no direct call for (text content,
//! visibility, value replacement, text lookup) run as small functions bound to
//! the element through `Runtime.callFunctionOn`.

use anyhow::{Context, anyhow};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use super::{Document, Node};
use crate::error::{HarvestError, HarvestResult};

const TEXT_CONTENT_JS: &str = "function() { return this.textContent; }";

// Same box test the browser runtime uses for "visible": a non-empty layout
// box and no `visibility: hidden`.
const IS_VISIBLE_JS: &str = r"function() {
    const style = window.getComputedStyle(this);
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    const rect = this.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}";

const TEXT_MATCH_ATTR: &str = "data-harvest-text";

static TEXT_MATCH_STAMP: AtomicU64 = AtomicU64::new(0);

/// JSON-encode a string so it can be spliced into a JS function body
fn js_string(value: &str) -> HarvestResult<String> {
    serde_json::to_string(value).map_err(|e| HarvestError::Other(format!("JS encode: {e}")))
}

/// A chromiumoxide page driven through the `Document` trait
#[derive(Clone)]
pub struct ChromiumDocument {
    page: Page,
}

impl ChromiumDocument {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn body(&self) -> HarvestResult<ChromiumNode> {
        let element = self
            .page
            .find_element("body")
            .await
            .context("Failed to resolve document body")?;
        Ok(ChromiumNode::new(element))
    }
}

impl Document for ChromiumDocument {
    type Node = ChromiumNode;

    async fn goto(&self, url: &str) -> HarvestResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| HarvestError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| HarvestError::Navigation {
                url: url.to_string(),
                message: format!("load did not finish: {e}"),
            })?;
        Ok(())
    }

    async fn add_style(&self, css: &str) -> HarvestResult<()> {
        let script = format!(
            "(() => {{ const s = document.createElement('style'); s.textContent = {}; document.head.appendChild(s); return true; }})()",
            js_string(css)?
        );
        self.page
            .evaluate(script.as_str())
            .await
            .context("Failed to inject style tag")?;
        Ok(())
    }

    async fn query(&self, selector: &str) -> HarvestResult<Option<ChromiumNode>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> HarvestResult<Vec<ChromiumNode>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .with_context(|| format!("Failed to query '{selector}'"))?;
        Ok(elements.into_iter().map(ChromiumNode::new).collect())
    }

    async fn query_text(&self, text: &str) -> HarvestResult<Vec<ChromiumNode>> {
        self.body().await?.query_text(text).await
    }
}

/// A chromiumoxide element driven through the `Node` trait
pub struct ChromiumNode {
    element: Element,
}

impl ChromiumNode {
    fn new(element: Element) -> Self {
        Self { element }
    }

    /// Run `function_declaration` with `this` bound to the element
    async fn call(&self, function_declaration: String) -> HarvestResult<Option<serde_json::Value>> {
        let returns = self
            .element
            .call_js_fn(function_declaration, false)
            .await
            .context("Failed to call function on element")?;

        if let Some(details) = returns.exception_details {
            return Err(anyhow!("Element function threw: {}", details.text).into());
        }
        Ok(returns.result.value)
    }
}

impl Node for ChromiumNode {
    async fn click(&self) -> HarvestResult<()> {
        self.element
            .click()
            .await
            .context("Failed to click element")?;
        Ok(())
    }

    async fn fill(&self, value: &str) -> HarvestResult<()> {
        let script = format!(
            r"function() {{
                this.focus();
                this.value = {};
                this.dispatchEvent(new Event('input', {{ bubbles: true }}));
                this.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }}",
            js_string(value)?
        );
        self.call(script).await?;
        Ok(())
    }

    async fn text_content(&self) -> HarvestResult<Option<String>> {
        let value = self.call(TEXT_CONTENT_JS.to_string()).await?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn attribute(&self, name: &str) -> HarvestResult<Option<String>> {
        let value = self
            .element
            .attribute(name)
            .await
            .with_context(|| format!("Failed to read attribute '{name}'"))?;
        Ok(value)
    }

    async fn is_visible(&self) -> HarvestResult<bool> {
        let value = self.call(IS_VISIBLE_JS.to_string()).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn query(&self, selector: &str) -> HarvestResult<Option<Self>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> HarvestResult<Vec<Self>> {
        let elements = self
            .element
            .find_elements(selector)
            .await
            .with_context(|| format!("Failed to query '{selector}' within element"))?;
        Ok(elements.into_iter().map(Self::new).collect())
    }

    async fn query_text(&self, text: &str) -> HarvestResult<Vec<Self>> {
        // Tag matching descendants with a per-lookup stamp, then resolve them
        // through a regular selector query so document order is preserved.
        let stamp = TEXT_MATCH_STAMP.fetch_add(1, Ordering::Relaxed).to_string();
        let tag_script = format!(
            r"function() {{
                const needle = {needle}.replace(/\s+/g, ' ').toLowerCase();
                let hits = 0;
                for (const el of this.querySelectorAll('*')) {{
                    let own = '';
                    for (const child of el.childNodes) {{
                        if (child.nodeType === Node.TEXT_NODE) own += child.textContent;
                    }}
                    if (own.replace(/\s+/g, ' ').toLowerCase().includes(needle)) {{
                        el.setAttribute('{attr}', {stamp});
                        hits++;
                    }}
                }}
                return hits;
            }}",
            needle = js_string(text)?,
            attr = TEXT_MATCH_ATTR,
            stamp = js_string(&stamp)?,
        );
        let hits = self.call(tag_script).await?;
        trace!("Text lookup '{}' tagged {:?} elements", text, hits);

        let selector = format!("[{TEXT_MATCH_ATTR}=\"{stamp}\"]");
        let matches = self.query_all(&selector).await?;

        let cleanup = format!(
            "function() {{ for (const el of this.querySelectorAll('{selector}')) el.removeAttribute('{TEXT_MATCH_ATTR}'); }}",
            selector = selector.replace('\'', "\\'"),
        );
        if let Err(e) = self.call(cleanup).await {
            trace!("Failed to clear text lookup markers: {}", e);
        }

        Ok(matches)
    }
}
