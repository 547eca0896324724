//! Integration tests for the metrics engine.

mod concurrency;
#[cfg(feature = "emitter")]
mod events;
mod support;
