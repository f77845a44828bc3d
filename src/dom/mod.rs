//! Page abstraction for the harvest pipeline
//!
//! Defines the `Document` and `Node` traits that abstract over the browser
//! engine (Chromium via chromiumoxide in production). Every pipeline stage
//! receives the document explicitly, so the order in which stages touch the
//! page is visible in the call graph and stages can be exercised against an
//! in-memory DOM.
//!
//! Text lookups (`query_text`) follow "get by text" semantics: an element
//! matches when its own text contains the needle, compared case-insensitively.
//! Results come back in document order.

pub mod chromium;

use crate::error::{HarvestError, HarvestResult};

/// One element on the currently loaded page.
///
/// A node is only meaningful while the page it was read from is current;
/// after pagination or navigation it must be looked up again.
#[allow(async_fn_in_trait)]
pub trait Node: Sized {
    /// Click the element
    async fn click(&self) -> HarvestResult<()>;

    /// Replace the value of an input element
    async fn fill(&self, value: &str) -> HarvestResult<()>;

    /// Full text content of the element, `None` when it has none
    async fn text_content(&self) -> HarvestResult<Option<String>>;

    /// Attribute value, `None` when the attribute is absent
    async fn attribute(&self, name: &str) -> HarvestResult<Option<String>>;

    /// Whether the element is rendered with a non-empty box
    async fn is_visible(&self) -> HarvestResult<bool>;

    /// First descendant matching `selector`
    async fn query(&self, selector: &str) -> HarvestResult<Option<Self>>;

    /// All descendants matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> HarvestResult<Vec<Self>>;

    /// All descendants whose own text contains `text`
    async fn query_text(&self, text: &str) -> HarvestResult<Vec<Self>>;

    /// First descendant matching `selector`, or `ElementNotFound`
    async fn locate(&self, selector: &str) -> HarvestResult<Self> {
        self.query(selector)
            .await?
            .ok_or_else(|| HarvestError::missing(selector))
    }

    /// First descendant with matching text, or `ElementNotFound`
    async fn locate_text(&self, text: &str) -> HarvestResult<Self> {
        self.query_text(text)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HarvestError::missing(format!("text={text}")))
    }
}

/// The page being automated.
#[allow(async_fn_in_trait)]
pub trait Document {
    type Node: Node;

    /// Navigate to `url` and wait for the load to finish
    async fn goto(&self, url: &str) -> HarvestResult<()>;

    /// Append a `<style>` element with `css` to the document head
    async fn add_style(&self, css: &str) -> HarvestResult<()>;

    /// First element matching `selector`
    async fn query(&self, selector: &str) -> HarvestResult<Option<Self::Node>>;

    /// All elements matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> HarvestResult<Vec<Self::Node>>;

    /// All elements whose own text contains `text`
    async fn query_text(&self, text: &str) -> HarvestResult<Vec<Self::Node>>;

    /// First element matching `selector`, or `ElementNotFound`
    async fn locate(&self, selector: &str) -> HarvestResult<Self::Node> {
        self.query(selector)
            .await?
            .ok_or_else(|| HarvestError::missing(selector))
    }

    /// First element with matching text, or `ElementNotFound`
    async fn locate_text(&self, text: &str) -> HarvestResult<Self::Node> {
        self.query_text(text)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HarvestError::missing(format!("text={text}")))
    }
}
