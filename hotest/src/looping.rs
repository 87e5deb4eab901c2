//! Driver loop: re-run a test body until every variant path has been taken.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, warn};

use crate::config::HotestConfig;
use crate::core::selection::Selection;
use crate::ctx::HotestCtx;
use crate::error::MaxRunsExceededError;
use crate::runtime::{RuntimeHandle, VariantsRuntime};

/// Summary of a finished enumeration.
#[derive(Debug)]
pub struct HotestOutcome {
    /// Context used by the last run, for post-hoc assertions.
    pub ctx: HotestCtx,
    pub runs_executed: u32,
    /// Full path taken by each run, in execution order. Holds one entry per
    /// run, so it grows with the size of the enumerated tree.
    pub paths: Vec<Selection>,
}

/// Run `body` once per variant path with a fresh [`HotestCtx`] per run.
///
/// Settings come from the environment (see [`HotestConfig::from_env`]).
/// Returns the context of the last run.
pub fn hotest<B>(body: B) -> Result<HotestCtx>
where
    B: FnMut(&mut HotestCtx) -> Result<()>,
{
    let config = HotestConfig::from_env()?;
    let outcome = hotest_with(&config, || Ok(HotestCtx::new()), |_| Ok(()), body)?;
    Ok(outcome.ctx)
}

/// Run `body` once per variant path, wrapping every run in hooks.
///
/// `before_test` builds the context for each run; `after_test` runs after the
/// body even when it failed or panicked. The first failing run stops the
/// enumeration and its error is returned; later paths are never attempted.
pub fn hotest_with<S, A, B>(
    config: &HotestConfig,
    mut before_test: S,
    mut after_test: A,
    mut body: B,
) -> Result<HotestOutcome>
where
    S: FnMut() -> Result<HotestCtx>,
    A: FnMut(&mut HotestCtx) -> Result<()>,
    B: FnMut(&mut HotestCtx) -> Result<()>,
{
    let mut run_loop = RunLoop::new(config)?;
    let mut last_ctx = None;

    while run_loop.begin_run()? {
        let run = run_loop.runs_executed();
        let mut ctx =
            before_test().with_context(|| format!("before_test hook failed in run {run}"))?;
        let previous = ctx.swap_runtime(Some(run_loop.handle()));
        let body_outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut ctx)));
        let after_outcome = panic::catch_unwind(AssertUnwindSafe(|| after_test(&mut ctx)));
        ctx.swap_runtime(previous);
        let settled = run_loop.end_run(body_outcome, after_outcome);
        last_ctx = Some(ctx);
        settled?;
    }

    let ctx = last_ctx.ok_or_else(|| anyhow!("variant enumeration finished without a run"))?;
    let (runs_executed, paths) = run_loop.finish();
    Ok(HotestOutcome {
        ctx,
        runs_executed,
        paths,
    })
}

/// Run a nested enumeration on an existing context.
///
/// Each run attaches a fresh runtime to `ctx` and restores whatever was
/// attached before (typically an outer driver's runtime), so the outer
/// enumeration never sees the inner choice points. Returns the number of runs.
pub fn hotest_in<B>(ctx: &mut HotestCtx, config: &HotestConfig, mut body: B) -> Result<u32>
where
    B: FnMut(&mut HotestCtx) -> Result<()>,
{
    let mut run_loop = RunLoop::new(config)?;
    while run_loop.begin_run()? {
        let previous = ctx.swap_runtime(Some(run_loop.handle()));
        let body_outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut *ctx)));
        ctx.swap_runtime(previous);
        run_loop.end_run(body_outcome, Ok(Ok(())))?;
    }
    Ok(run_loop.finish().0)
}

/// Run bookkeeping shared by the sync and async drivers.
pub(crate) struct RunLoop {
    runtime: RuntimeHandle,
    max_runs: Option<u32>,
    runs_executed: u32,
    paths: Vec<Selection>,
}

impl RunLoop {
    pub(crate) fn new(config: &HotestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            runtime: VariantsRuntime::new().into_handle(),
            max_runs: config.max_runs,
            runs_executed: 0,
            paths: Vec::new(),
        })
    }

    pub(crate) fn handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub(crate) fn runs_executed(&self) -> u32 {
        self.runs_executed
    }

    /// Install the next selection. Returns `false` once every path was taken.
    pub(crate) fn begin_run(&mut self) -> Result<bool> {
        let mut runtime = self.runtime.borrow_mut();
        if !runtime.has_pending_runs() {
            info!(runs = self.runs_executed, "variant enumeration complete");
            return Ok(false);
        }
        if let Some(max_runs) = self.max_runs.filter(|&max| self.runs_executed >= max) {
            return Err(MaxRunsExceededError { max_runs }.into());
        }
        let selection = runtime.next_selection()?;
        runtime.start_run(selection);
        self.runs_executed += 1;
        Ok(true)
    }

    /// Record the path the run took and turn the body/hook outcomes into the
    /// run's result. Panics are resumed here, after all bookkeeping.
    pub(crate) fn end_run(
        &mut self,
        body: thread::Result<Result<()>>,
        after: thread::Result<Result<()>>,
    ) -> Result<()> {
        let run = self.runs_executed;
        let path = self.runtime.borrow().carried_path();
        debug!(run, path = %path, "variants run finished");
        let label = format!("run {run} (path {path})");
        self.paths.push(path);
        settle(&label, body, after)
    }

    pub(crate) fn finish(self) -> (u32, Vec<Selection>) {
        (self.runs_executed, self.paths)
    }
}

/// Precedence: body panic, hook panic, body error, hook error.
fn settle(
    label: &str,
    body: thread::Result<Result<()>>,
    after: thread::Result<Result<()>>,
) -> Result<()> {
    let body = match body {
        Ok(result) => result,
        Err(payload) => {
            if after.is_err() {
                warn!(run = label, "after_test hook panicked while a body panic was in flight");
            }
            panic::resume_unwind(payload)
        }
    };
    let after = after.unwrap_or_else(|payload| panic::resume_unwind(payload));
    match (body, after) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(err), after) => {
            if let Err(hook_err) = after {
                warn!(run = label, error = %hook_err, "after_test hook failed after body failure");
            }
            Err(err.context(format!("variant {label} failed")))
        }
        (Ok(()), Err(err)) => Err(err.context(format!("after_test hook failed in {label}"))),
    }
}
