//! Oriel engine crate.
//!
//! Owns the window/GPU runtime, the offscreen rendering components, the
//! embedded web-surface wrapper, and the script bridge used by higher layers.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod web;
pub mod bridge;
pub mod scene;
