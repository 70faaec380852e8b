//! Platform window + event loop.
//!
//! Owns winit, the window's GPU context, and translation of window-system
//! events into the engine's input types. Single window: the shell drives
//! one compositing surface.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
