//! Run-selection state for one enumeration.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::core::frame::{Choice, FinishedFrame, Frame};
use crate::core::selection::Selection;
use crate::error::{ExhaustedError, UnbalancedBlockError};

/// Shared handle attached to a context for the duration of a run.
pub type RuntimeHandle = Rc<RefCell<VariantsRuntime>>;

/// Owns the active frame stack and the path carried between runs.
///
/// A run replays `selection` position by position; choice points past its end
/// start at branch 0. Every finished frame lands in `path`, which becomes the
/// carried path once the run ends.
#[derive(Debug, Default)]
pub struct VariantsRuntime {
    selection: Selection,
    stack: Vec<Frame>,
    path: Vec<Choice>,
    started: bool,
}

impl VariantsRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_handle(self) -> RuntimeHandle {
        Rc::new(RefCell::new(self))
    }

    /// True before the first run, or while the carried path can still advance.
    pub fn has_pending_runs(&self) -> bool {
        !self.started || !self.carried_path().is_exhausted()
    }

    /// Path the next run should replay.
    pub fn next_selection(&self) -> Result<Selection, ExhaustedError> {
        if !self.started {
            return Ok(Selection::empty());
        }
        let carried = self.carried_path();
        carried.advance().ok_or_else(|| ExhaustedError {
            path: carried.to_string(),
        })
    }

    /// Install `selection` and reset per-run state.
    pub fn start_run(&mut self, selection: Selection) {
        debug!(selection = %selection, "starting variants run");
        self.selection = selection;
        self.stack.clear();
        self.path.clear();
        self.started = true;
    }

    /// Open a choice point and return its entry position.
    pub fn enter_block(&mut self) -> usize {
        let position = self.path.len();
        let chosen_index = self.selection.chosen_at(position).unwrap_or(0);
        self.stack.push(Frame::new(position, chosen_index));
        // Placeholder until finish_block records the final branch count.
        self.path.push(Choice {
            chosen_index,
            branch_count: 0,
        });
        position
    }

    pub fn exit_block(&mut self) -> Result<FinishedFrame, UnbalancedBlockError> {
        self.stack
            .pop()
            .map(Frame::finish)
            .ok_or(UnbalancedBlockError)
    }

    /// Record a popped frame at the position it occupied.
    pub fn finish_block(&mut self, finished: FinishedFrame) {
        if finished.missed_selection() {
            warn!(
                position = finished.position,
                chosen_index = finished.choice.chosen_index,
                branch_count = finished.choice.branch_count,
                "selected variant was never declared; body structure changed between runs"
            );
        }
        match self.path.get_mut(finished.position) {
            Some(slot) => *slot = finished.choice,
            None => {
                self.path.resize(finished.position, Choice::default());
                self.path.push(finished.choice);
            }
        }
    }

    pub fn current_block(&mut self) -> Option<&mut Frame> {
        self.stack.last_mut()
    }

    /// Branch count of the innermost open block, 0 outside any block.
    pub fn next_block_index(&self) -> usize {
        self.stack.last().map_or(0, Frame::branch_count)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Path recorded by the latest run.
    pub fn carried_path(&self) -> Selection {
        Selection::from_choices(self.path.clone())
    }
}
