//! Embedded web surface.
//!
//! Wraps an offscreen web-rendering backend behind the [`WebEngine`] /
//! [`WebView`] traits, manages the surface lifecycle, and owns the bridge
//! registry and component-slot table attached to the page.

mod slots;
pub mod software;
mod surface;
mod view;

pub use slots::{ComponentSlot, SharedSlots, SlotMap};
pub use surface::{SurfaceState, WebSurface};
pub use view::{BitmapData, ConsoleLevel, ViewEvent, ViewNotice, WebEngine, WebView};
