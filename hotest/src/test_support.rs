//! Test-only helpers for recording what a variant run did.

use std::cell::RefCell;

/// Append-only log shared by hooks and bodies through `&ActionLog`.
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: RefCell<Vec<String>>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// Snapshot of everything logged so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Number of entries equal to `entry`.
    pub fn count(&self, entry: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|logged| logged.as_str() == entry)
            .count()
    }
}

/// Expected log for runs that each produce `before, <run entries..>, after`.
pub fn wrapped_runs(runs: &[&[&str]]) -> Vec<String> {
    let mut expected = Vec::new();
    for run in runs {
        expected.push("before".to_string());
        expected.extend(run.iter().map(|entry| entry.to_string()));
        expected.push("after".to_string());
    }
    expected
}
