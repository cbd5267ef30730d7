// Assertions - auto-retry checks for scenario post-conditions
//
// Unlike the page primitives, these are meant to fail the scenario: they
// return `Error::AssertionFailed`.
//
// See: https://playwright.dev/docs/test-assertions

use crate::driver::PageDriver;
use crate::error::{Error, Result};
use std::time::Duration;

/// Default timeout for assertions (5 seconds, matching Playwright)
const DEFAULT_ASSERTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default polling interval for assertions (100ms)
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Creates an expectation on the page with auto-retry behavior.
///
/// ```ignore
/// expect_page(&page)
///     .with_message("User was not redirected to login page")
///     .to_have_url(&settings.url("login"))
///     .await?;
/// ```
pub fn expect_page(page: &dyn PageDriver) -> PageExpectation<'_> {
    PageExpectation {
        page,
        timeout: DEFAULT_ASSERTION_TIMEOUT,
        poll_interval: DEFAULT_POLL_INTERVAL,
        message: None,
        negate: false,
    }
}

/// Fails with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::AssertionFailed(message.into()))
    }
}

/// Expectation on page-level state.
pub struct PageExpectation<'p> {
    page: &'p dyn PageDriver,
    timeout: Duration,
    poll_interval: Duration,
    message: Option<String>,
    negate: bool,
}

#[allow(clippy::wrong_self_convention)]
impl PageExpectation<'_> {
    /// Sets a custom timeout for this assertion.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom poll interval for this assertion.
    ///
    /// Default is 100ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Message reported in front of the failure details.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Negates the assertion.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Asserts that the page URL equals `expected`.
    ///
    /// This assertion will retry until the URL matches or timeout.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#page-assertions-to-have-url>
    pub async fn to_have_url(self, expected: &str) -> Result<()> {
        let start = std::time::Instant::now();

        loop {
            let actual = self.page.url().await?;

            let matches = if self.negate {
                actual != expected
            } else {
                actual == expected
            };

            if matches {
                return Ok(());
            }

            if start.elapsed() >= self.timeout {
                let detail = if self.negate {
                    format!(
                        "Expected page NOT to have URL '{}', but it did after {:?}",
                        expected, self.timeout
                    )
                } else {
                    format!(
                        "Expected page to have URL '{}', but had '{}' after {:?}",
                        expected, actual, self.timeout
                    )
                };
                let message = match self.message {
                    Some(message) => format!("{}: {}", message, detail),
                    None => detail,
                };
                return Err(Error::AssertionFailed(message));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
