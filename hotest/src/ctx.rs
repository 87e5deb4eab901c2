//! Per-run test context: the runtime slot plus a write-once fixture store.

use std::any::{Any, type_name};
use std::collections::HashMap;

use anyhow::Result;

use crate::error::CtxError;
use crate::runtime::RuntimeHandle;

/// Object threaded through every test body.
///
/// The driver attaches its runtime here for the duration of a run; the
/// variants protocol reads it back. Fixtures are keyed by name and can be set
/// only once per context.
#[derive(Debug, Default)]
pub struct HotestCtx {
    runtime: Option<RuntimeHandle>,
    items: HashMap<String, Box<dyn Any>>,
}

impl HotestCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fixture. Overwriting an existing key is refused so that a test
    /// can't silently replace a fixture another step relies on.
    pub fn set<T: Any>(&mut self, key: impl Into<String>, value: T) -> Result<(), CtxError> {
        let key = key.into();
        if self.items.contains_key(&key) {
            return Err(CtxError::DuplicateKey(key));
        }
        self.items.insert(key, Box::new(value));
        Ok(())
    }

    pub fn get<T: Any>(&self, key: &str) -> Result<&T, CtxError> {
        let value = self
            .items
            .get(key)
            .ok_or_else(|| CtxError::MissingKey(key.to_string()))?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| CtxError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Result<&mut T, CtxError> {
        let value = self
            .items
            .get_mut(key)
            .ok_or_else(|| CtxError::MissingKey(key.to_string()))?;
        value
            .downcast_mut::<T>()
            .ok_or_else(|| CtxError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// True while a driver has a runtime attached to this context.
    pub fn in_variants_run(&self) -> bool {
        self.runtime.is_some()
    }

    pub(crate) fn runtime(&self) -> Option<RuntimeHandle> {
        self.runtime.clone()
    }

    /// Attach `runtime` and hand back whatever was attached before.
    pub(crate) fn swap_runtime(&mut self, runtime: Option<RuntimeHandle>) -> Option<RuntimeHandle> {
        std::mem::replace(&mut self.runtime, runtime)
    }
}

/// Apply `setup` to `ctx` and return it; handy as a `before_test` hook.
pub fn setup_hotest_ctx<F>(mut ctx: HotestCtx, setup: F) -> Result<HotestCtx>
where
    F: FnOnce(&mut HotestCtx) -> Result<()>,
{
    setup(&mut ctx)?;
    Ok(ctx)
}
