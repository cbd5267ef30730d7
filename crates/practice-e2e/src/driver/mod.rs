// Driver - the browser capability page objects are built on
//
// Page objects only ever talk to a `PageDriver`. The Playwright adapter
// (feature `playwright`) is the production implementation; tests plug in
// scripted fakes.

use crate::error::Result;
use crate::locator::Locator;
use async_trait::async_trait;
use std::time::Duration;

#[cfg(feature = "playwright")]
pub mod playwright;

/// One browser tab.
///
/// Implementations report a wait that ran out as [`crate::Error::Timeout`]
/// and every other failure as some other variant; page primitives rely on
/// that split to tell "not there" from "something broke".
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigates to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Returns the URL currently displayed.
    async fn url(&self) -> Result<String>;

    /// Waits until an element matching `selector` is visible.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Returns the rendered text of the first element matching `selector`.
    async fn inner_text(&self, selector: &str) -> Result<String>;

    /// Returns whether the element is currently visible (no waiting).
    async fn is_visible(&self, locator: &Locator) -> Result<bool>;

    /// Clicks the element, giving up after `timeout`.
    ///
    /// The driver must abandon the action itself once `timeout` passes, so
    /// an abandoned click never lands later.
    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<()>;

    /// Replaces the element's content with `text`, giving up after `timeout`.
    async fn fill(&self, locator: &Locator, text: &str, timeout: Duration) -> Result<()>;

    /// Captures the viewport as PNG bytes.
    async fn screenshot(&self) -> Result<Vec<u8>>;
}
