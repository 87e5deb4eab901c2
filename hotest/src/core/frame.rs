//! Per-choice-point bookkeeping for a single run.

/// Finalized state of one choice point: which branch was taken and how many
/// branches were declared next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Choice {
    pub chosen_index: usize,
    pub branch_count: usize,
}

impl Choice {
    /// True if a later sibling branch exists and can be taken by a future run.
    pub fn is_advanceable(&self) -> bool {
        self.chosen_index + 1 < self.branch_count
    }
}

/// A live choice point on the runtime stack.
///
/// `chosen_index` is fixed when the frame is created; `branch_count` only
/// grows as sibling branches are declared in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    position: usize,
    chosen_index: usize,
    branch_count: usize,
}

impl Frame {
    pub fn new(position: usize, chosen_index: usize) -> Self {
        Self {
            position,
            chosen_index,
            branch_count: 0,
        }
    }

    /// Entry order of this choice point within the run.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn chosen_index(&self) -> usize {
        self.chosen_index
    }

    pub fn branch_count(&self) -> usize {
        self.branch_count
    }

    /// Register the next sibling branch.
    ///
    /// Returns the branch's index and whether its body should run. The count
    /// is bumped for every declaration, selected or not, so the number of
    /// siblings is fully known after the first run that enters this frame.
    pub fn declare_branch(&mut self) -> (usize, bool) {
        let index = self.branch_count;
        self.branch_count += 1;
        (index, index == self.chosen_index)
    }

    pub(crate) fn finish(self) -> FinishedFrame {
        FinishedFrame {
            position: self.position,
            choice: Choice {
                chosen_index: self.chosen_index,
                branch_count: self.branch_count,
            },
        }
    }
}

/// A frame popped off the stack, waiting to be recorded into the carried path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedFrame {
    pub position: usize,
    pub choice: Choice,
}

impl FinishedFrame {
    /// The seeded branch was never declared during this run.
    ///
    /// An empty group (`branch_count == 0`) is not a mismatch.
    pub fn missed_selection(&self) -> bool {
        self.choice.branch_count > 0 && self.choice.chosen_index >= self.choice.branch_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_branch_selects_only_the_chosen_index() {
        let mut frame = Frame::new(0, 1);
        assert_eq!(frame.declare_branch(), (0, false));
        assert_eq!(frame.declare_branch(), (1, true));
        assert_eq!(frame.declare_branch(), (2, false));
        assert_eq!(frame.branch_count(), 3);
        assert_eq!(frame.chosen_index(), 1);
    }

    #[test]
    fn empty_group_is_never_advanceable() {
        let finished = Frame::new(4, 0).finish();
        assert_eq!(finished.position, 4);
        assert!(!finished.choice.is_advanceable());
        assert!(!finished.missed_selection());
    }

    #[test]
    fn last_branch_is_not_advanceable() {
        let choice = Choice {
            chosen_index: 2,
            branch_count: 3,
        };
        assert!(!choice.is_advanceable());
        assert!(
            Choice {
                chosen_index: 1,
                branch_count: 3
            }
            .is_advanceable()
        );
    }

    #[test]
    fn missed_selection_flags_undeclared_branch() {
        let mut frame = Frame::new(0, 3);
        frame.declare_branch();
        frame.declare_branch();
        assert!(frame.finish().missed_selection());
    }
}
