//! The async driver must enumerate exactly like the sync one, with bodies that
//! really suspend between choice points.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use anyhow::{Result, anyhow};
use futures::executor::block_on;
use hotest::test_support::{ActionLog, wrapped_runs};
use hotest::{
    HotestConfig, HotestCtx, hotest_async, hotest_in_async, hotest_with_async, variant_async,
    variants_async,
};

/// Returns `Pending` once (waking itself) before completing.
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

fn yield_now() -> YieldOnce {
    YieldOnce { yielded: false }
}

#[test]
fn async_nested_groups_enumerate_depth_first() {
    hotest::logging::init_for_tests();
    let log = ActionLog::new();
    let outcome = block_on(hotest_with_async(
        &HotestConfig::default(),
        || {
            log.push("before");
            Ok(HotestCtx::new())
        },
        |_| {
            log.push("after");
            Ok(())
        },
        async |ctx: &mut HotestCtx| -> Result<()> {
            log.push("start");
            variants_async(ctx, "", async |ctx: &mut HotestCtx| -> Result<()> {
                variant_async(ctx, "", async |ctx: &mut HotestCtx| -> Result<()> {
                    yield_now().await;
                    variants_async(ctx, "vsA", async |ctx: &mut HotestCtx| -> Result<()> {
                        variant_async(ctx, "", async |_: &mut HotestCtx| -> Result<()> {
                            log.push("A1");
                            Ok(())
                        })
                        .await?;
                        yield_now().await;
                        variant_async(ctx, "", async |_: &mut HotestCtx| -> Result<()> {
                            log.push("A2");
                            Ok(())
                        })
                        .await
                    })
                    .await
                })
                .await?;
                variant_async(ctx, "", async |_: &mut HotestCtx| -> Result<()> {
                    yield_now().await;
                    log.push("B");
                    Ok(())
                })
                .await
            })
            .await?;
            log.push("end");
            Ok(())
        },
    ))
    .expect("hotest");

    assert_eq!(
        log.entries(),
        wrapped_runs(&[
            &["start", "A1", "end"],
            &["start", "A2", "end"],
            &["start", "B", "end"],
        ])
    );
    let paths: Vec<String> = outcome.paths.iter().map(ToString::to_string).collect();
    assert_eq!(paths, ["0/0", "0/1", "1"]);
}

#[test]
fn async_failure_stops_after_hook() {
    let log = ActionLog::new();
    let err = block_on(hotest_with_async(
        &HotestConfig::default(),
        || {
            log.push("before");
            Ok(HotestCtx::new())
        },
        |_| {
            log.push("after");
            Ok(())
        },
        async |ctx: &mut HotestCtx| -> Result<()> {
            variants_async(ctx, "", async |ctx: &mut HotestCtx| -> Result<()> {
                for index in 1..=3 {
                    variant_async(ctx, "", async |_: &mut HotestCtx| -> Result<()> {
                        log.push(format!("v{index}"));
                        if index == 2 {
                            return Err(anyhow!("v2 is broken"));
                        }
                        Ok(())
                    })
                    .await?;
                }
                Ok(())
            })
            .await
        },
    ))
    .expect_err("second run fails");

    assert_eq!(err.root_cause().to_string(), "v2 is broken");
    assert_eq!(log.entries(), wrapped_runs(&[&["v1"], &["v2"]]));
}

#[test]
fn async_panic_still_runs_after_hook() {
    let log = ActionLog::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        block_on(hotest_with_async(
            &HotestConfig::default(),
            || {
                log.push("before");
                Ok(HotestCtx::new())
            },
            |_| {
                log.push("after");
                Ok(())
            },
            async |ctx: &mut HotestCtx| -> Result<()> {
                variants_async(ctx, "", async |ctx: &mut HotestCtx| -> Result<()> {
                    variant_async(ctx, "", async |_: &mut HotestCtx| -> Result<()> {
                        yield_now().await;
                        panic!("assertion inside async variant")
                    })
                    .await
                })
                .await
            },
        ))
    }));

    assert!(outcome.is_err());
    assert_eq!(log.entries(), wrapped_runs(&[&[]]));
}

#[test]
fn hotest_async_returns_last_context() {
    let ctx = block_on(hotest_async(async |ctx: &mut HotestCtx| -> Result<()> {
        variants_async(ctx, "", async |ctx: &mut HotestCtx| -> Result<()> {
            variant_async(ctx, "", async |ctx: &mut HotestCtx| -> Result<()> {
                ctx.set("picked", "left")?;
                Ok(())
            })
            .await?;
            variant_async(ctx, "", async |ctx: &mut HotestCtx| -> Result<()> {
                ctx.set("picked", "right")?;
                Ok(())
            })
            .await
        })
        .await
    }))
    .expect("hotest");

    assert_eq!(ctx.get::<&str>("picked").expect("fixture"), &"right");
}

#[test]
fn async_nested_enumeration_runs_inside_outer_branch() {
    let log = ActionLog::new();
    let outcome = block_on(hotest_with_async(
        &HotestConfig::default(),
        || Ok(HotestCtx::new()),
        |_| Ok(()),
        async |ctx: &mut HotestCtx| -> Result<()> {
            variants_async(ctx, "outer", async |ctx: &mut HotestCtx| -> Result<()> {
                variant_async(ctx, "", async |_: &mut HotestCtx| -> Result<()> {
                    log.push("o1");
                    Ok(())
                })
                .await?;
                variant_async(ctx, "", async |ctx: &mut HotestCtx| -> Result<()> {
                    log.push("o2");
                    let runs = hotest_in_async(
                        ctx,
                        &HotestConfig::default(),
                        async |ctx: &mut HotestCtx| -> Result<()> {
                            variants_async(ctx, "inner", async |ctx: &mut HotestCtx| -> Result<()> {
                                variant_async(ctx, "", async |_: &mut HotestCtx| -> Result<()> {
                                    log.push("i1");
                                    Ok(())
                                })
                                .await?;
                                variant_async(ctx, "", async |_: &mut HotestCtx| -> Result<()> {
                                    log.push("i2");
                                    Ok(())
                                })
                                .await
                            })
                            .await
                        },
                    )
                    .await?;
                    assert_eq!(runs, 2);
                    Ok(())
                })
                .await
            })
            .await
        },
    ))
    .expect("hotest");

    assert_eq!(log.entries(), ["o1", "o2", "i1", "i2"]);
    assert_eq!(outcome.runs_executed, 2);
}
