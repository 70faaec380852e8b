//! Core engine-facing contracts.
//!
//! The stable interface between the platform runtime and the shell layer: a
//! per-frame context plus the `App` callback trait. Runtime internals never
//! leak through here.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
