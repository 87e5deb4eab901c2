//! Deterministic, pure logic shared by the variants engine.
//!
//! Core modules hold no references to contexts or hooks. They operate on plain
//! values and return deterministic outputs suitable for tests.

pub mod frame;
pub mod selection;
