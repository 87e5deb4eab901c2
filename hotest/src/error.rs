//! Typed errors surfaced by the variants engine.
//!
//! Drivers and bodies propagate `anyhow::Error`; these types stay reachable
//! through `downcast_ref` for callers that need to branch on them.

use thiserror::Error;

/// `next_selection` was asked for another run after every choice on the
/// carried path reached its last branch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no pending runs: every choice on path {path} is exhausted")]
pub struct ExhaustedError {
    pub path: String,
}

/// The enumeration would have started more runs than the configured limit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("variant enumeration exceeded max_runs={max_runs}")]
pub struct MaxRunsExceededError {
    pub max_runs: u32,
}

/// A variants block was closed without a matching open block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("variants block closed with no open block on the runtime stack")]
pub struct UnbalancedBlockError;

/// Fixture store misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CtxError {
    #[error("key {0} already exists")]
    DuplicateKey(String),
    #[error("key {0} doesn't exist")]
    MissingKey(String),
    #[error("key {key} does not hold a value of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}
