//! Preload scripts.

pub mod preload;

pub use preload::{PreloadScript, PreloadScriptStorage};
