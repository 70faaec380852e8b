use crate::bridge::{ScriptContext, ScriptValue};
use crate::input::{Key, Modifiers, MouseButton};

/// Input event in the embedded view's own coordinate space.
///
/// Produced by [`crate::input::ViewRouter`]; coordinates are integer pixels
/// relative to the view's top-left corner, scrolls are in pixels (already
/// scaled from wheel notches).
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    MouseMoved { x: i32, y: i32 },
    MouseDown { x: i32, y: i32, button: MouseButton },
    MouseUp { x: i32, y: i32, button: MouseButton },
    ScrollByPixel { dx: i32, dy: i32 },
    KeyDown { key: Key, code: u32, modifiers: Modifiers },
    KeyUp { key: Key, code: u32, modifiers: Modifiers },
    /// Committed text input.
    Char { text: String },
    FocusGained,
    FocusLost,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConsoleLevel {
    Debug,
    Log,
    Info,
    Warning,
    Error,
}

/// Out-of-band notification from the embedded view.
///
/// Views queue these as they happen; the surface drains them once per frame
/// and reacts (logging, re-binding the bridge on [`ViewNotice::DomReady`]).
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNotice {
    LoadBegan { url: String },
    LoadFinished { url: String },
    LoadFailed { url: String, description: String },
    /// The page's DOM is ready and a fresh script context exists.
    DomReady,
    Console {
        level: ConsoleLevel,
        message: String,
        source: String,
        line: u32,
    },
}

/// Borrowed view of a view's rendered pixels.
///
/// Pixel format is BGRA8 with premultiplied alpha. `row_bytes` may exceed
/// `width * 4`; consumers must honor the stride.
#[derive(Debug)]
pub struct BitmapData<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub row_bytes: usize,
}

/// One embedded page: an offscreen browser view owned by a [`WebEngine`].
pub trait WebView {
    fn size(&self) -> (u32, u32);

    /// Resizes the view's backing surface. Same-size calls are no-ops.
    fn resize(&mut self, width: u32, height: u32);

    fn load_url(&mut self, url: &str) -> anyhow::Result<()>;

    /// Delivers one routed input event.
    fn fire_event(&mut self, event: ViewEvent);

    /// Evaluates script in the view's current context. A script exception
    /// is logged and surfaces as [`ScriptValue::Null`], never an error.
    fn eval_script(&mut self, source: &str) -> ScriptValue;

    /// The view's current script context, for installing bridge functions.
    fn script_context(&mut self) -> &mut dyn ScriptContext;

    /// True when the view has painted pixels not yet consumed by
    /// [`with_bitmap`](Self::with_bitmap).
    fn is_dirty(&self) -> bool;

    fn clear_dirty(&mut self);

    /// Exposes the current pixel buffer for the duration of the callback.
    fn with_bitmap(&mut self, f: &mut dyn FnMut(&BitmapData<'_>));

    /// Takes all pending notifications, oldest first.
    fn drain_notices(&mut self) -> Vec<ViewNotice>;
}

/// Factory and per-frame driver for a web-rendering backend.
///
/// Backends own process-wide engine state (renderer, timers, script VM);
/// views created from one engine share it. All methods are called from the
/// frame-loop thread only.
pub trait WebEngine {
    fn create_view(&mut self, width: u32, height: u32) -> anyhow::Result<Box<dyn WebView>>;

    /// Advances timers, script jobs, and layout for all views.
    fn update(&mut self);

    /// Paints every dirty view into its bitmap.
    fn render(&mut self);
}
