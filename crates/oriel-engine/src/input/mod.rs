//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types. The
//! runtime translates window-system events into [`InputEvent`]s; the
//! [`ViewRouter`] then decides which of those reach the embedded web view,
//! and in what coordinate space.

mod frame;
mod router;
mod state;
mod types;

pub use frame::InputFrame;
pub use router::{ViewRouter, SCROLL_PIXELS_PER_NOTCH};
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
    ScrollDelta,
};
