use super::{AttachmentType, Reporter, Status};
use crate::error::{Error, Result};
use parking_lot::Mutex;

/// A recorded step and everything nested in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: String,
    /// `None` while the step is still open
    pub status: Option<Status>,
    pub steps: Vec<StepRecord>,
    pub attachments: Vec<AttachmentRecord>,
}

/// A recorded attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRecord {
    pub name: String,
    pub kind: AttachmentType,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
struct Tree {
    steps: Vec<StepRecord>,
    attachments: Vec<AttachmentRecord>,
    // Child index at each nesting level of the open steps
    open: Vec<usize>,
}

impl Tree {
    fn children_at_depth(&mut self, depth: usize) -> &mut Vec<StepRecord> {
        let mut children = &mut self.steps;
        for &index in &self.open[..depth] {
            children = &mut children[index].steps;
        }
        children
    }

    fn innermost(&mut self) -> Option<&mut StepRecord> {
        let (&last, parents) = self.open.split_last()?;
        let mut children = &mut self.steps;
        for &index in parents {
            children = &mut children[index].steps;
        }
        children.get_mut(last)
    }
}

/// Reporter that keeps the step tree in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    tree: Mutex<Tree>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level steps recorded so far.
    pub fn steps(&self) -> Vec<StepRecord> {
        self.tree.lock().steps.clone()
    }

    /// Attachments recorded outside of any step.
    pub fn attachments(&self) -> Vec<AttachmentRecord> {
        self.tree.lock().attachments.clone()
    }

    /// Names of every recorded step, depth first.
    pub fn step_names(&self) -> Vec<String> {
        fn walk(steps: &[StepRecord], out: &mut Vec<String>) {
            for step in steps {
                out.push(step.name.clone());
                walk(&step.steps, out);
            }
        }

        let mut names = Vec::new();
        walk(&self.tree.lock().steps, &mut names);
        names
    }

    /// Number of steps that are still open.
    pub fn open_depth(&self) -> usize {
        self.tree.lock().open.len()
    }
}

impl Reporter for MemoryReporter {
    fn start_step(&self, name: &str) -> Result<()> {
        let mut tree = self.tree.lock();
        let depth = tree.open.len();
        let children = tree.children_at_depth(depth);
        children.push(StepRecord {
            name: name.to_string(),
            status: None,
            steps: Vec::new(),
            attachments: Vec::new(),
        });
        let index = children.len() - 1;
        tree.open.push(index);
        Ok(())
    }

    fn stop_step(&self, status: Status) -> Result<()> {
        let mut tree = self.tree.lock();
        let step = tree
            .innermost()
            .ok_or_else(|| Error::Report("no open step to stop".to_string()))?;
        step.status = Some(status);
        tree.open.pop();
        Ok(())
    }

    fn log_step(&self, name: &str) -> Result<()> {
        let mut tree = self.tree.lock();
        let depth = tree.open.len();
        tree.children_at_depth(depth).push(StepRecord {
            name: name.to_string(),
            status: Some(Status::Passed),
            steps: Vec::new(),
            attachments: Vec::new(),
        });
        Ok(())
    }

    fn attach(&self, name: &str, kind: AttachmentType, content: &[u8]) -> Result<()> {
        let record = AttachmentRecord {
            name: name.to_string(),
            kind,
            content: content.to_vec(),
        };
        let mut tree = self.tree.lock();
        if tree.open.is_empty() {
            tree.attachments.push(record);
        } else if let Some(step) = tree.innermost() {
            step.attachments.push(record);
        }
        Ok(())
    }
}
