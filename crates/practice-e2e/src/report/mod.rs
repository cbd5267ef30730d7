// Report - the test report sink
//
// Reports are a tree of steps per test, plus binary attachments. The
// `Reporter` trait is what page flows, the log bridge and the failure hook
// write to; `AllureReporter` persists it in the Allure results format and
// `MemoryReporter` keeps it in memory for inspection.
//
// See: https://allurereport.org/docs/how-it-works-test-result-file/

mod allure;
mod memory;

pub use allure::AllureReporter;
pub use memory::{AttachmentRecord, MemoryReporter, StepRecord};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Outcome of a step or test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Broken,
}

/// Kind of an attachment, used for its MIME type and file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentType {
    Png,
    Webm,
}

impl AttachmentType {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AttachmentType::Png => "image/png",
            AttachmentType::Webm => "video/webm",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AttachmentType::Png => "png",
            AttachmentType::Webm => "webm",
        }
    }
}

/// Sink for report steps and attachments.
///
/// Steps nest: `start_step` opens a child of the innermost open step,
/// `stop_step` closes it. Implementations must tolerate being called from
/// any thread.
pub trait Reporter: Send + Sync {
    /// Opens a step named `name`.
    fn start_step(&self, name: &str) -> Result<()>;

    /// Closes the innermost open step with `status`.
    fn stop_step(&self, status: Status) -> Result<()>;

    /// Attaches `content` to the innermost open step (or the test itself).
    fn attach(&self, name: &str, kind: AttachmentType, content: &[u8]) -> Result<()>;

    /// Records a step that opens and closes immediately.
    fn log_step(&self, name: &str) -> Result<()> {
        self.start_step(name)?;
        self.stop_step(Status::Passed)
    }
}

/// Runs `body` inside a report step named `name`.
///
/// The step is closed as passed or failed depending on the body's result.
/// Reporter faults are logged and never replace the body's outcome.
pub async fn step<T, F>(reporter: &dyn Reporter, name: &str, body: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if let Err(e) = reporter.start_step(name) {
        tracing::warn!("Could not open report step '{}': {}", name, e);
    }

    let result = body.await;

    let status = if result.is_ok() {
        Status::Passed
    } else {
        Status::Failed
    };
    if let Err(e) = reporter.stop_step(status) {
        tracing::warn!("Could not close report step '{}': {}", name, e);
    }

    result
}

/// Severity label of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocker,
    Critical,
    #[default]
    Normal,
    Minor,
    Trivial,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Blocker => "blocker",
            Severity::Critical => "critical",
            Severity::Normal => "normal",
            Severity::Minor => "minor",
            Severity::Trivial => "trivial",
        }
    }
}

/// A `name=value` label attached to a test result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

/// Scenario-level metadata: title, suite hierarchy, feature and severity.
#[derive(Debug, Clone, Default)]
pub struct TestMetadata {
    pub title: String,
    pub parent_suite: Option<String>,
    pub suite: Option<String>,
    pub feature: Option<String>,
    pub story: Option<String>,
    pub severity: Severity,
    pub tags: Vec<String>,
}

impl TestMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn parent_suite(mut self, value: impl Into<String>) -> Self {
        self.parent_suite = Some(value.into());
        self
    }

    pub fn suite(mut self, value: impl Into<String>) -> Self {
        self.suite = Some(value.into());
        self
    }

    pub fn feature(mut self, value: impl Into<String>) -> Self {
        self.feature = Some(value.into());
        self
    }

    pub fn story(mut self, value: impl Into<String>) -> Self {
        self.story = Some(value.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Flattens the metadata into report labels.
    pub fn labels(&self) -> Vec<Label> {
        let mut labels = Vec::new();
        let mut push = |name: &str, value: &str| {
            labels.push(Label {
                name: name.to_string(),
                value: value.to_string(),
            })
        };

        if let Some(value) = &self.parent_suite {
            push("parentSuite", value);
        }
        if let Some(value) = &self.suite {
            push("suite", value);
        }
        if let Some(value) = &self.feature {
            push("feature", value);
        }
        if let Some(value) = &self.story {
            push("story", value);
        }
        push("severity", self.severity.as_str());
        for tag in &self.tags {
            push("tag", tag);
        }
        labels
    }
}
