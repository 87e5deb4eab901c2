//! Choice-point protocol: `variants` opens a group, `variant` declares one
//! branch inside it.

use std::panic::{self, AssertUnwindSafe};

use anyhow::Result;
use tracing::{debug, trace};

use crate::ctx::HotestCtx;
use crate::runtime::RuntimeHandle;

/// Open a group of alternative branches.
///
/// Inside a driver run, the group is registered with the runtime and closed
/// again after `body` returns, fails or panics; the failure then continues to
/// propagate. Outside a run, `body` simply executes once.
pub fn variants<F>(ctx: &mut HotestCtx, comment: &str, body: F) -> Result<()>
where
    F: FnOnce(&mut HotestCtx) -> Result<()>,
{
    let Some(runtime) = ctx.runtime() else {
        return body(ctx);
    };
    open_block(&runtime, comment);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(ctx)));
    let closed = close_block(&runtime);
    match outcome {
        Ok(result) => result.and(closed),
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Declare the next branch of the innermost open group.
///
/// The branch counts toward the group's siblings whether or not it runs;
/// `body` executes only when this branch is the one selected for the run.
/// With no open group, `body` executes unconditionally.
pub fn variant<F>(ctx: &mut HotestCtx, comment: &str, body: F) -> Result<()>
where
    F: FnOnce(&mut HotestCtx) -> Result<()>,
{
    match declare_branch(ctx, comment) {
        Some(false) => Ok(()),
        Some(true) | None => body(ctx),
    }
}

pub(crate) fn open_block(runtime: &RuntimeHandle, comment: &str) {
    let mut runtime = runtime.borrow_mut();
    let parent_branch = runtime.next_block_index();
    let position = runtime.enter_block();
    debug!(position, parent_branch, comment, "entering variants");
}

/// Pop the innermost frame and record it. Always called once per `open_block`.
pub(crate) fn close_block(runtime: &RuntimeHandle) -> Result<()> {
    let mut runtime = runtime.borrow_mut();
    let finished = runtime.exit_block()?;
    runtime.finish_block(finished);
    Ok(())
}

/// `None` when there is no open group; otherwise whether the branch is selected.
pub(crate) fn declare_branch(ctx: &HotestCtx, comment: &str) -> Option<bool> {
    let runtime = ctx.runtime()?;
    let mut runtime = runtime.borrow_mut();
    let frame = runtime.current_block()?;
    let (index, selected) = frame.declare_branch();
    if !selected {
        trace!(
            position = frame.position(),
            index,
            chosen = frame.chosen_index(),
            comment,
            "skipping variant"
        );
    }
    Some(selected)
}
