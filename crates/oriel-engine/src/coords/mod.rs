//! Logical-pixel geometry shared by slots, input routing, and compositing.

mod rect;

pub use rect::Rect;
