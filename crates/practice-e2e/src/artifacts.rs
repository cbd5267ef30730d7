// Failure artifacts - screenshot and video attached when a scenario fails
//
// Attachment problems are logged and swallowed; the scenario's own failure
// is always what the caller gets back.

use crate::error::Result;
use crate::report::{AttachmentType, Reporter};
use async_trait::async_trait;
use regex::Regex;
use std::future::Future;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("slug pattern should compile"));

/// Turns a test identifier into a file-name-safe slug.
///
/// `tests/register_login_contact.rs::full_flow` → `tests-register-login-contact-rs-full-flow`
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Where failure evidence comes from: usually the browser session.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Captures the current page as PNG bytes.
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Finishes the video recording and returns the WEBM bytes.
    ///
    /// Recording stops; the session cannot be used afterwards.
    async fn video(&self) -> Result<Vec<u8>>;
}

/// Attaches `{slug}.png` and `{slug}.webm` for `test_id` to the report.
pub async fn attach_failure_artifacts(
    source: &dyn ArtifactSource,
    reporter: &dyn Reporter,
    test_id: &str,
) {
    let slug = slugify(test_id);

    let screenshot = source.screenshot().await.and_then(|png| {
        reporter.attach(&format!("{}.png", slug), AttachmentType::Png, &png)
    });
    if let Err(e) = screenshot {
        tracing::error!("Error attaching screenshot: {}", e);
    }

    let video = source.video().await.and_then(|webm| {
        reporter.attach(&format!("{}.webm", slug), AttachmentType::Webm, &webm)
    });
    if let Err(e) = video {
        tracing::error!("Error attaching video: {}", e);
    }
}

/// Runs a scenario and, only if it fails, attaches failure artifacts.
///
/// Returns the scenario's own result unchanged.
pub async fn run_scenario<F>(
    source: &dyn ArtifactSource,
    reporter: &dyn Reporter,
    test_id: &str,
    scenario: F,
) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let result = scenario.await;
    if let Err(e) = &result {
        tracing::error!("Scenario '{}' failed: {}", test_id, e);
        attach_failure_artifacts(source, reporter, test_id).await;
    }
    result
}
