//! Async flavour of the variants protocol and driver.
//!
//! Bodies are async closures. Suspension inside a body never touches engine
//! state; the engine only acts at group entry/exit and around each run, so any
//! executor can drive these futures.

use std::panic::{self, AssertUnwindSafe};

use anyhow::{Context, Result, anyhow};
use futures::FutureExt;

use crate::config::HotestConfig;
use crate::ctx::HotestCtx;
use crate::looping::{HotestOutcome, RunLoop};
use crate::variants::{close_block, declare_branch, open_block};

/// Async [`variants`](crate::variants::variants).
pub async fn variants_async<F>(ctx: &mut HotestCtx, comment: &str, body: F) -> Result<()>
where
    F: AsyncFnOnce(&mut HotestCtx) -> Result<()>,
{
    let Some(runtime) = ctx.runtime() else {
        return body(ctx).await;
    };
    open_block(&runtime, comment);
    let outcome = AssertUnwindSafe(body(ctx)).catch_unwind().await;
    let closed = close_block(&runtime);
    match outcome {
        Ok(result) => result.and(closed),
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Async [`variant`](crate::variants::variant).
pub async fn variant_async<F>(ctx: &mut HotestCtx, comment: &str, body: F) -> Result<()>
where
    F: AsyncFnOnce(&mut HotestCtx) -> Result<()>,
{
    match declare_branch(ctx, comment) {
        Some(false) => Ok(()),
        Some(true) | None => body(ctx).await,
    }
}

/// Async [`hotest`](crate::looping::hotest).
pub async fn hotest_async<B>(body: B) -> Result<HotestCtx>
where
    B: AsyncFnMut(&mut HotestCtx) -> Result<()>,
{
    let config = HotestConfig::from_env()?;
    let outcome = hotest_with_async(&config, || Ok(HotestCtx::new()), |_| Ok(()), body).await?;
    Ok(outcome.ctx)
}

/// Async [`hotest_with`](crate::looping::hotest_with). Hooks stay synchronous.
pub async fn hotest_with_async<S, A, B>(
    config: &HotestConfig,
    mut before_test: S,
    mut after_test: A,
    mut body: B,
) -> Result<HotestOutcome>
where
    S: FnMut() -> Result<HotestCtx>,
    A: FnMut(&mut HotestCtx) -> Result<()>,
    B: AsyncFnMut(&mut HotestCtx) -> Result<()>,
{
    let mut run_loop = RunLoop::new(config)?;
    let mut last_ctx = None;

    while run_loop.begin_run()? {
        let run = run_loop.runs_executed();
        let mut ctx =
            before_test().with_context(|| format!("before_test hook failed in run {run}"))?;
        let previous = ctx.swap_runtime(Some(run_loop.handle()));
        let body_outcome = AssertUnwindSafe(body(&mut ctx)).catch_unwind().await;
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

/// Async [`hotest_in`](crate::looping::hotest_in).
pub async fn hotest_in_async<B>(
    ctx: &mut HotestCtx,
    config: &HotestConfig,
    mut body: B,
) -> Result<u32>
where
    B: AsyncFnMut(&mut HotestCtx) -> Result<()>,
{
    let mut run_loop = RunLoop::new(config)?;
    while run_loop.begin_run()? {
        let previous = ctx.swap_runtime(Some(run_loop.handle()));
        let body_outcome = AssertUnwindSafe(body(&mut *ctx)).catch_unwind().await;
        ctx.swap_runtime(previous);
        run_loop.end_run(body_outcome, Ok(Ok(())))?;
    }
    Ok(run_loop.finish().0)
}
