// Allure results writer
//
// Produces `{uuid}-result.json` per test and `{uuid}-attachment.{ext}` per
// attachment in a results directory, ready for `allure generate`.

use super::{AttachmentType, Label, Reporter, Status, TestMetadata};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Attachment {
    pub name: String,
    pub source: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StepResult {
    pub name: String,
    pub status: Status,
    pub stage: String,
    pub steps: Vec<StepResult>,
    pub attachments: Vec<Attachment>,
    pub start: i64,
    pub stop: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StatusDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TestResult {
    pub uuid: String,
    pub history_id: String,
    pub name: String,
    pub full_name: String,
    pub status: Status,
    pub status_details: StatusDetails,
    pub stage: String,
    pub steps: Vec<StepResult>,
    pub attachments: Vec<Attachment>,
    pub labels: Vec<Label>,
    pub start: i64,
    pub stop: i64,
}

#[derive(Debug, Default)]
struct Running {
    test: Option<TestResult>,
    open: Vec<StepResult>,
}

/// Reporter writing the Allure 2 results format.
///
/// One test is in progress at a time: [`AllureReporter::start_test`] opens
/// it, steps and attachments accumulate under it, and
/// [`AllureReporter::stop_test`] writes the result file.
#[derive(Debug)]
pub struct AllureReporter {
    dir: PathBuf,
    running: Mutex<Running>,
}

impl AllureReporter {
    /// Creates a reporter writing into `dir` (created if missing).
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::from(e).context(format!("creating {}", dir.display())))?;
        Ok(Self {
            dir,
            running: Mutex::new(Running::default()),
        })
    }

    /// The results directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Starts a test result identified by `full_name`.
    pub fn start_test(&self, full_name: &str, meta: &TestMetadata) {
        let previous = {
            let mut running = self.running.lock();
            running.open.clear();
            running.test.replace(TestResult {
                uuid: uuid::Uuid::new_v4().to_string(),
                history_id: full_name.to_string(),
                name: meta.title.clone(),
                full_name: full_name.to_string(),
                status: Status::Passed,
                status_details: StatusDetails::default(),
                stage: "running".to_string(),
                steps: Vec::new(),
                attachments: Vec::new(),
                labels: meta.labels(),
                start: now_millis(),
                stop: 0,
            })
        };

        // Logged only once the lock is released: a bridged event comes back
        // into this reporter.
        if let Some(previous) = previous {
            tracing::warn!(
                "Starting '{}' while '{}' is still open; its result is discarded",
                full_name,
                previous.full_name
            );
        }
    }

    /// Finishes the current test and writes its result file.
    ///
    /// Steps still open are closed as broken. Returns the path written.
    pub fn stop_test(&self, status: Status, message: Option<String>) -> Result<PathBuf> {
        let mut running = self.running.lock();
        while !running.open.is_empty() {
            close_innermost(&mut running, Status::Broken)?;
        }

        let mut test = running
            .test
            .take()
            .ok_or_else(|| Error::Report("no test in progress".to_string()))?;
        test.status = status;
        test.status_details.message = message;
        test.stage = "finished".to_string();
        test.stop = now_millis();

        let path = self.dir.join(format!("{}-result.json", test.uuid));
        std::fs::write(&path, serde_json::to_vec_pretty(&test)?)?;
        Ok(path)
    }
}

impl Reporter for AllureReporter {
    fn start_step(&self, name: &str) -> Result<()> {
        let mut running = self.running.lock();
        if running.test.is_none() {
            return Err(Error::Report(format!("step '{}' outside of a test", name)));
        }
        running.open.push(StepResult {
            name: name.to_string(),
            status: Status::Passed,
            stage: "running".to_string(),
            steps: Vec::new(),
            attachments: Vec::new(),
            start: now_millis(),
            stop: 0,
        });
        Ok(())
    }

    fn stop_step(&self, status: Status) -> Result<()> {
        let mut running = self.running.lock();
        close_innermost(&mut running, status)
    }

    fn log_step(&self, name: &str) -> Result<()> {
        // One lock for open and close, so concurrent loggers cannot nest
        let mut guard = self.running.lock();
        let running = &mut *guard;
        if running.test.is_none() {
            return Err(Error::Report(format!("step '{}' outside of a test", name)));
        }

        let now = now_millis();
        let step = StepResult {
            name: name.to_string(),
            status: Status::Passed,
            stage: "finished".to_string(),
            steps: Vec::new(),
            attachments: Vec::new(),
            start: now,
            stop: now,
        };
        if let Some(parent) = running.open.last_mut() {
            parent.steps.push(step);
        } else if let Some(test) = running.test.as_mut() {
            test.steps.push(step);
        }
        Ok(())
    }

    fn attach(&self, name: &str, kind: AttachmentType, content: &[u8]) -> Result<()> {
        let mut guard = self.running.lock();
        let running = &mut *guard;
        if running.test.is_none() {
            return Err(Error::Report(format!(
                "attachment '{}' outside of a test",
                name
            )));
        }

        let source = format!("{}-attachment.{}", uuid::Uuid::new_v4(), kind.extension());
        std::fs::write(self.dir.join(&source), content)?;

        let attachment = Attachment {
            name: name.to_string(),
            source,
            mime_type: kind.mime_type().to_string(),
        };
        if let Some(step) = running.open.last_mut() {
            step.attachments.push(attachment);
        } else if let Some(test) = running.test.as_mut() {
            test.attachments.push(attachment);
        }
        Ok(())
    }
}

fn close_innermost(running: &mut Running, status: Status) -> Result<()> {
    let mut step = running
        .open
        .pop()
        .ok_or_else(|| Error::Report("no open step to stop".to_string()))?;
    step.status = status;
    step.stage = "finished".to_string();
    step.stop = now_millis();

    if let Some(parent) = running.open.last_mut() {
        parent.steps.push(step);
    } else if let Some(test) = running.test.as_mut() {
        test.steps.push(step);
    }
    Ok(())
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
