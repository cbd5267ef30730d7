// BasePage - timeout-bounded interaction primitives shared by all page objects
//
// Every primitive converts the driver's "not found / not visible / timed out"
// signalling into a definite boolean plus a log line. The `Result`-returning
// variants keep the fault cause for callers that want it.

use crate::driver::PageDriver;
use crate::error::{Error, Result};
use crate::locator::Locator;
use std::future::Future;
use std::time::{Duration, Instant};

/// Default timeout for element and notification waits (5 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Selector of the banner shown after a successful action
pub const SUCCESS_NOTIFICATION_SELECTOR: &str = "#flash";

/// Selector of the banner shown after a rejected action
pub const ERROR_NOTIFICATION_SELECTOR: &str = ".alert-danger";

/// Polling interval for visibility checks (100ms)
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Slack on top of `timeout` before a driver call is abandoned outright
const WAIT_GRACE: Duration = Duration::from_millis(250);

/// Interaction primitives bound to one page handle and one timeout.
///
/// `BasePage` is `Copy`: page objects hold their own copy, all pointing at
/// the same page handle.
#[derive(Clone, Copy)]
pub struct BasePage<'p> {
    page: &'p dyn PageDriver,
    timeout: Duration,
    success_selector: &'static str,
    error_selector: &'static str,
}

impl<'p> BasePage<'p> {
    /// Creates primitives for `page` with the default 5 second timeout.
    pub fn new(page: &'p dyn PageDriver) -> Self {
        Self::with_timeout(page, DEFAULT_TIMEOUT)
    }

    /// Creates primitives for `page` with a custom timeout.
    pub fn with_timeout(page: &'p dyn PageDriver, timeout: Duration) -> Self {
        Self {
            page,
            timeout,
            success_selector: SUCCESS_NOTIFICATION_SELECTOR,
            error_selector: ERROR_NOTIFICATION_SELECTOR,
        }
    }

    /// Replaces the notification selectors.
    ///
    /// For screens whose banners use different markup; the detection logic
    /// stays the same.
    pub fn with_notification_selectors(
        mut self,
        success_selector: &'static str,
        error_selector: &'static str,
    ) -> Self {
        self.success_selector = success_selector;
        self.error_selector = error_selector;
        self
    }

    /// The page handle these primitives act on.
    pub fn page(&self) -> &'p dyn PageDriver {
        self.page
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn success_selector(&self) -> &'static str {
        self.success_selector
    }

    pub fn error_selector(&self) -> &'static str {
        self.error_selector
    }

    /// Waits for the success banner and returns its text.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if the banner does not appear within the timeout,
    /// any other error for a driver fault.
    pub async fn read_success_notification(&self) -> Result<String> {
        let selector = self.success_selector;
        self.bounded(selector, async {
            self.page.wait_for_selector(selector, self.timeout).await?;
            self.page.inner_text(selector).await
        })
        .await
    }

    /// Returns true iff the success banner appears and reads exactly `expected`.
    pub async fn is_success_notification_displayed(&self, expected: &str) -> bool {
        match self.read_success_notification().await {
            Ok(message) if message == expected => {
                tracing::info!("Success message displayed: {}", message);
                true
            }
            Ok(message) => {
                tracing::warn!(
                    "Success message text mismatch: expected '{}', got '{}'",
                    expected,
                    message
                );
                false
            }
            Err(e) if e.is_timeout() => {
                tracing::error!("Success message not displayed within the expected time.");
                false
            }
            Err(e) => {
                tracing::error!("An error occurred while checking success message: {}", e);
                false
            }
        }
    }

    /// Waits for the error banner.
    ///
    /// Returns `Ok(false)` when it does not show up in time; `Err` only for
    /// driver faults.
    pub async fn probe_error_notification(&self) -> Result<bool> {
        let selector = self.error_selector;
        let waited = self
            .bounded(selector, self.page.wait_for_selector(selector, self.timeout))
            .await;
        match waited {
            Ok(()) => Ok(true),
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns true iff the error banner appears before the timeout.
    pub async fn is_error_notification_displayed(&self) -> bool {
        match self.probe_error_notification().await {
            Ok(true) => true,
            Ok(false) => {
                tracing::debug!("Error message not displayed within the expected time.");
                false
            }
            Err(e) => {
                tracing::error!("An error occurred while checking error message: {}", e);
                false
            }
        }
    }

    /// Polls until `locator` is visible.
    ///
    /// Returns `Ok(false)` if it is still not visible once the timeout has
    /// elapsed.
    pub async fn wait_until_visible(&self, locator: &Locator) -> Result<bool> {
        let start = Instant::now();
        let poll = async {
            loop {
                match self.page.is_visible(locator).await {
                    Ok(true) => return Ok(true),
                    Ok(false) => {}
                    Err(e) if e.is_timeout() => {}
                    Err(e) => return Err(e),
                }

                let elapsed = start.elapsed();
                if elapsed >= self.timeout {
                    return Ok(false);
                }

                tokio::time::sleep(POLL_INTERVAL.min(self.timeout - elapsed)).await;
            }
        };

        match self.bounded(&locator.to_string(), poll).await {
            Err(e) if e.is_timeout() => Ok(false),
            other => other,
        }
    }

    /// Clicks `locator` once it is visible.
    ///
    /// Returns `Ok(false)` if it never became visible.
    pub async fn try_click(&self, locator: &Locator) -> Result<bool> {
        if !self.wait_until_visible(locator).await? {
            return Ok(false);
        }
        self.bounded(&locator.to_string(), self.page.click(locator, self.timeout))
            .await?;
        Ok(true)
    }

    /// Fills `locator` with `text` once it is visible.
    ///
    /// Returns `Ok(false)` if it never became visible.
    pub async fn try_fill(&self, locator: &Locator, text: &str) -> Result<bool> {
        if !self.wait_until_visible(locator).await? {
            return Ok(false);
        }
        self.bounded(&locator.to_string(), self.page.fill(locator, text, self.timeout))
            .await?;
        Ok(true)
    }

    /// Clicks the element if it becomes visible; false otherwise.
    pub async fn click_element(&self, locator: &Locator) -> bool {
        match self.try_click(locator).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::error!("Element {} not found or not visible.", locator);
                false
            }
            Err(e) => {
                tracing::error!("Failed to click element {}: {}", locator, e);
                false
            }
        }
    }

    /// Fills the element with `text` if it becomes visible; false otherwise.
    pub async fn fill_element(&self, locator: &Locator, text: &str) -> bool {
        match self.try_fill(locator, text).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::error!("Element {} not found or not visible.", locator);
                false
            }
            Err(e) => {
                tracing::error!("Failed to fill element {}: {}", locator, e);
                false
            }
        }
    }

    // Caps a driver interaction at timeout + grace so no primitive can block
    // indefinitely, even when the driver ignores the timeout it was given.
    async fn bounded<T>(&self, target: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout + WAIT_GRACE, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "'{}' not ready after {:?}",
                target, self.timeout
            ))),
        }
    }
}

impl std::fmt::Debug for BasePage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasePage")
            .field("timeout", &self.timeout)
            .field("success_selector", &self.success_selector)
            .field("error_selector", &self.error_selector)
            .finish_non_exhaustive()
    }
}
