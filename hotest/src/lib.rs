//! Run one test body once per combination of nested variant choices.
//!
//! A body opens groups of alternatives with [`variants()`] and declares the
//! alternatives with [`variant()`]. The driver ([`hotest`], [`hotest_with`])
//! re-executes the body until every depth-first path through the choice tree
//! has been taken exactly once. The tree is never declared upfront: inner
//! groups are discovered only when the branch containing them runs.
//!
//! - **[`core`](crate::core)**: Pure, deterministic logic (frames,
//!   selections, odometer backtracking). No contexts, no hooks.
//! - **[`runtime`]**: Per-enumeration state machine built on the core types.
//! - **[`variants`](mod@crate::variants)**, **[`nonblocking`]**: the
//!   choice-point protocol, sync and async.
//! - **[`looping`]**: the driver loop and its hooks.
//!
//! ```
//! use hotest::{hotest, variant, variants};
//!
//! let mut seen = Vec::new();
//! hotest(|ctx| {
//!     variants(ctx, "flavour", |ctx| {
//!         variant(ctx, "vanilla", |_| {
//!             seen.push("vanilla");
//!             Ok(())
//!         })?;
//!         variant(ctx, "chocolate", |_| {
//!             seen.push("chocolate");
//!             Ok(())
//!         })
//!     })
//! })?;
//! assert_eq!(seen, ["vanilla", "chocolate"]);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod ctx;
pub mod error;
pub mod logging;
pub mod looping;
pub mod nonblocking;
pub mod runtime;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod variants;

pub use crate::config::HotestConfig;
pub use crate::ctx::{HotestCtx, setup_hotest_ctx};
pub use crate::looping::{HotestOutcome, hotest, hotest_in, hotest_with};
pub use crate::nonblocking::{
    hotest_async, hotest_in_async, hotest_with_async, variant_async, variants_async,
};
pub use crate::variants::{variant, variants};
