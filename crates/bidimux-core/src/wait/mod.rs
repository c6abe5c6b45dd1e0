//! Concurrency primitives used throughout the engine.

mod deferred;

pub use deferred::Deferred;
