// Playwright adapter - `PageDriver` and `ArtifactSource` over playwright-rs
//
// `BrowserSession` owns the whole stack for one test: server connection,
// browser, a context recording video, and its single page.

use crate::artifacts::ArtifactSource;
use crate::driver::PageDriver;
use crate::error::{Error, Result};
use crate::locator::Locator;
use async_trait::async_trait;
use playwright_rs::{
    Browser, BrowserContext, BrowserContextOptions, ClickOptions, FillOptions, LaunchOptions, Page,
    Playwright, RecordVideo,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Polling interval while waiting for a selector (100ms)
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Set to `1`/`true` to run the browser headless (CI).
pub const HEADLESS_ENV: &str = "PRACTICE_HEADLESS";

fn driver_error(error: playwright_rs::Error) -> Error {
    match error {
        playwright_rs::Error::Timeout(msg) | playwright_rs::Error::AssertionTimeout(msg) => {
            Error::Timeout(msg)
        }
        playwright_rs::Error::ElementNotFound(selector) => {
            Error::Timeout(format!("element not found: {}", selector))
        }
        playwright_rs::Error::NavigationTimeout { url, duration_ms } => Error::Timeout(format!(
            "navigation to '{}' exceeded {}ms",
            url, duration_ms
        )),
        other => Error::Driver(other.to_string()),
    }
}

/// Playwright takes action timeouts in milliseconds.
fn timeout_ms(timeout: Duration) -> f64 {
    timeout.as_secs_f64() * 1000.0
}

/// How the browser and its context are launched.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub headless: bool,
    /// Delay added to every browser action, in milliseconds
    pub slow_mo_ms: f64,
    pub args: Vec<String>,
    /// Use the window's natural size instead of an emulated viewport
    pub no_viewport: bool,
    pub accept_downloads: bool,
    pub record_video: bool,
}

impl Default for LaunchProfile {
    fn default() -> Self {
        Self {
            headless: false,
            slow_mo_ms: 600.0,
            args: vec!["--start-maximized".to_string()],
            no_viewport: true,
            accept_downloads: true,
            record_video: true,
        }
    }
}

impl LaunchProfile {
    /// The default profile, headless when `PRACTICE_HEADLESS` is set.
    pub fn from_env() -> Self {
        let headless = std::env::var(HEADLESS_ENV)
            .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            headless,
            ..Self::default()
        }
    }
}

/// A Playwright page as a [`PageDriver`].
#[derive(Clone)]
pub struct PlaywrightPage {
    page: Page,
}

impl PlaywrightPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// The underlying playwright-rs page.
    pub fn inner(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl PageDriver for PlaywrightPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url, None).await.map_err(driver_error)?;
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        Ok(self.page.url())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let locator = self.page.locator(selector).await.first();
        let start = Instant::now();

        loop {
            if locator.is_visible().await.map_err(driver_error)? {
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(Error::Timeout(format!(
                    "waiting for '{}' to be visible exceeded {:?}",
                    selector, timeout
                )));
            }

            tokio::time::sleep(SELECTOR_POLL_INTERVAL.min(timeout - elapsed)).await;
        }
    }

    async fn inner_text(&self, selector: &str) -> Result<String> {
        self.page
            .locator(selector)
            .await
            .first()
            .inner_text()
            .await
            .map_err(driver_error)
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.page
            .locator(&locator.to_selector())
            .await
            .is_visible()
            .await
            .map_err(driver_error)
    }

    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        let options = ClickOptions::builder()
            .timeout(timeout_ms(timeout))
            .build();
        self.page
            .locator(&locator.to_selector())
            .await
            .click(Some(options))
            .await
            .map_err(driver_error)
    }

    async fn fill(&self, locator: &Locator, text: &str, timeout: Duration) -> Result<()> {
        let options = FillOptions::builder().timeout(timeout_ms(timeout)).build();
        self.page
            .locator(&locator.to_selector())
            .await
            .fill(text, Some(options))
            .await
            .map_err(driver_error)
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.page.screenshot(None).await.map_err(driver_error)
    }
}

/// One browser, one recording context, one page.
pub struct BrowserSession {
    playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
    page: PlaywrightPage,
    video_dir: Option<tempfile::TempDir>,
    context_closed: AtomicBool,
}

impl BrowserSession {
    /// Starts Playwright and opens a Chromium page with `profile`.
    pub async fn launch(profile: &LaunchProfile) -> Result<Self> {
        let playwright = Playwright::launch().await.map_err(driver_error)?;

        let launch_options = LaunchOptions::new()
            .headless(profile.headless)
            .slow_mo(profile.slow_mo_ms)
            .args(profile.args.clone());
        let browser = playwright
            .chromium()
            .launch_with_options(launch_options)
            .await
            .map_err(driver_error)?;

        let video_dir = if profile.record_video {
            Some(tempfile::Builder::new().prefix("videos").tempdir()?)
        } else {
            None
        };

        let mut context_options = BrowserContextOptions::builder()
            .no_viewport(profile.no_viewport)
            .accept_downloads(profile.accept_downloads);
        if let Some(dir) = &video_dir {
            context_options = context_options.record_video(RecordVideo {
                dir: dir.path().to_string_lossy().into_owned(),
                size: None,
            });
        }
        let context = browser
            .new_context_with_options(context_options.build())
            .await
            .map_err(driver_error)?;
        let page = context.new_page().await.map_err(driver_error)?;

        tracing::debug!(
            "Browser session started (headless: {}, video: {})",
            profile.headless,
            video_dir.is_some()
        );

        Ok(Self {
            playwright,
            browser,
            context,
            page: PlaywrightPage::new(page),
            video_dir,
            context_closed: AtomicBool::new(false),
        })
    }

    /// The session's page.
    pub fn page(&self) -> &PlaywrightPage {
        &self.page
    }

    /// Closes the context, browser and Playwright server.
    pub async fn close(self) -> Result<()> {
        self.close_context().await?;
        self.browser.close().await.map_err(driver_error)?;
        self.playwright.shutdown().await.map_err(driver_error)
    }

    async fn close_context(&self) -> Result<()> {
        if self.context_closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.context.close().await.map_err(driver_error)
    }

    async fn video_path(&self) -> Result<PathBuf> {
        let dir = self
            .video_dir
            .as_ref()
            .ok_or_else(|| Error::Report("video recording is disabled".to_string()))?;

        let mut entries = tokio::fs::read_dir(dir.path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "webm") {
                return Ok(path);
            }
        }
        Err(Error::Report(format!(
            "no video written to {}",
            dir.path().display()
        )))
    }
}

#[async_trait]
impl ArtifactSource for BrowserSession {
    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.page.screenshot().await
    }

    async fn video(&self) -> Result<Vec<u8>> {
        // The video file is only complete once its context is closed
        self.close_context().await?;
        let path = self.video_path().await?;
        Ok(tokio::fs::read(path).await?)
    }
}
