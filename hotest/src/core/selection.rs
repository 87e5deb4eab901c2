//! Odometer-style backtracking over the carried path.

use std::fmt;

use crate::core::frame::Choice;

/// Ordered choices, one per choice point entered, indexed by entry position.
///
/// Used both as the path replayed by a run and as the path a finished run
/// leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    choices: Vec<Choice>,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_choices(choices: Vec<Choice>) -> Self {
        Self { choices }
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Branch index to replay at `position`, if this selection reaches that far.
    pub fn chosen_at(&self, position: usize) -> Option<usize> {
        self.choices.get(position).map(|choice| choice.chosen_index)
    }

    /// True if no choice on this path can move to a later sibling.
    pub fn is_exhausted(&self) -> bool {
        !self.choices.iter().any(Choice::is_advanceable)
    }

    /// Compute the path for the next run, or `None` when exhausted.
    ///
    /// The deepest advanceable choice ticks forward by one and everything
    /// after it is dropped: the subtree past a changed choice is unknown and
    /// must be rediscovered. The advanced choice keeps its discovered
    /// `branch_count`.
    pub fn advance(&self) -> Option<Selection> {
        let position = self.choices.iter().rposition(Choice::is_advanceable)?;
        let mut choices = self.choices[..=position].to_vec();
        choices[position].chosen_index += 1;
        Some(Selection { choices })
    }
}

impl fmt::Display for Selection {
    /// Render as `/`-joined chosen indices (`0/2/1`), or `root` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.choices.is_empty() {
            return f.write_str("root");
        }
        let parts: Vec<String> = self
            .choices
            .iter()
            .map(|choice| choice.chosen_index.to_string())
            .collect();
        f.write_str(&parts.join("/"))
    }
}
