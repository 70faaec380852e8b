//! Software web backend.
//!
//! A minimal in-process implementation of [`WebEngine`]/[`WebView`] with no
//! real browser behind it: pages don't load, script doesn't run, but the
//! view paints a recognizable test pattern, queues the load notices a real
//! backend would, and records every event it is fired. Used by the demo
//! shell when no engine is linked in, and by tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::bridge::{BridgeFn, ScriptArgs, ScriptContext, ScriptValue};

use super::view::{BitmapData, ViewEvent, ViewNotice, WebEngine, WebView};

/// Script context backed by a plain function table.
///
/// Cheap to clone; clones share the table, so a handle taken before the
/// owning view is boxed still sees later installations.
#[derive(Clone, Default)]
pub struct SoftwareScriptContext {
    functions: Rc<RefCell<HashMap<(String, String), BridgeFn>>>,
}

impl SoftwareScriptContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes an installed function the way page script would.
    pub fn call(&self, namespace: &str, name: &str, args: &ScriptArgs) -> ScriptValue {
        let func = self
            .functions
            .borrow()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned();
        match func {
            Some(f) => f(args),
            None => {
                log::error!("software context: {namespace}.{name} is not installed");
                ScriptValue::Null
            }
        }
    }

    pub fn installed_count(&self) -> usize {
        self.functions.borrow().len()
    }
}

impl ScriptContext for SoftwareScriptContext {
    fn install_function(&mut self, namespace: &str, name: &str, func: BridgeFn) {
        self.functions
            .borrow_mut()
            .insert((namespace.to_string(), name.to_string()), func);
    }
}

pub struct SoftwareView {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    dirty: bool,
    frame: u64,
    context: SoftwareScriptContext,
    notices: VecDeque<ViewNotice>,
    events: Vec<ViewEvent>,
}

impl SoftwareView {
    fn new(width: u32, height: u32, context: SoftwareScriptContext) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
            dirty: false,
            frame: 0,
            context,
            notices: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Events delivered so far, in order. Test hook.
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    fn paint(&mut self) {
        // Diagonal gradient with a moving band, so consecutive frames and
        // resizes are visually distinguishable.
        self.frame += 1;
        let band = (self.frame % 256) as u32;
        for y in 0..self.height {
            for x in 0..self.width {
                let i = ((y * self.width + x) * 4) as usize;
                self.pixels[i] = (x * 255 / self.width.max(1)) as u8; // B
                self.pixels[i + 1] = (y * 255 / self.height.max(1)) as u8; // G
                self.pixels[i + 2] = if (x + y) % 256 == band { 255 } else { 64 }; // R
                self.pixels[i + 3] = 255; // A
            }
        }
        self.dirty = true;
    }
}

impl WebView for SoftwareView {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width * height * 4) as usize];
        self.paint();
    }

    fn load_url(&mut self, url: &str) -> anyhow::Result<()> {
        // No network, no DOM: complete the load immediately.
        self.notices.push_back(ViewNotice::LoadBegan { url: url.to_string() });
        self.notices.push_back(ViewNotice::DomReady);
        self.notices.push_back(ViewNotice::LoadFinished { url: url.to_string() });
        self.paint();
        Ok(())
    }

    fn fire_event(&mut self, event: ViewEvent) {
        self.events.push(event);
    }

    fn eval_script(&mut self, source: &str) -> ScriptValue {
        log::warn!("software view cannot evaluate script ({} bytes dropped)", source.len());
        ScriptValue::Null
    }

    fn script_context(&mut self) -> &mut dyn ScriptContext {
        &mut self.context
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn with_bitmap(&mut self, f: &mut dyn FnMut(&BitmapData<'_>)) {
        let bitmap = BitmapData {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
            row_bytes: (self.width * 4) as usize,
        };
        f(&bitmap);
    }

    fn drain_notices(&mut self) -> Vec<ViewNotice> {
        self.notices.drain(..).collect()
    }
}

/// Engine that hands out [`SoftwareView`]s sharing one script context.
#[derive(Default)]
pub struct SoftwareEngine {
    context: SoftwareScriptContext,
    frame: u64,
}

impl SoftwareEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the context every view from this engine will use.
    pub fn context_handle(&self) -> SoftwareScriptContext {
        self.context.clone()
    }
}

impl WebEngine for SoftwareEngine {
    fn create_view(&mut self, width: u32, height: u32) -> anyhow::Result<Box<dyn WebView>> {
        Ok(Box::new(SoftwareView::new(width, height, self.context.clone())))
    }

    fn update(&mut self) {
        self.frame += 1;
    }

    fn render(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_handle_sees_installed_functions() {
        let mut engine = SoftwareEngine::new();
        let handle = engine.context_handle();

        let mut view = engine.create_view(64, 64).unwrap();
        view.script_context()
            .install_function("native", "answer", Rc::new(|_| ScriptValue::Number(42.0)));

        assert_eq!(
            handle.call("native", "answer", &ScriptArgs::default()),
            ScriptValue::Number(42.0)
        );
    }

    #[test]
    fn load_produces_dom_ready_then_finish() {
        let mut engine = SoftwareEngine::new();
        let mut view = engine.create_view(64, 64).unwrap();
        view.load_url("file:///demo/index.html").unwrap();

        let notices = view.drain_notices();
        assert!(matches!(notices[0], ViewNotice::LoadBegan { .. }));
        assert!(matches!(notices[1], ViewNotice::DomReady));
        assert!(matches!(notices[2], ViewNotice::LoadFinished { .. }));
        assert!(view.drain_notices().is_empty());
    }

    #[test]
    fn paint_marks_dirty_and_bitmap_matches_size() {
        let mut engine = SoftwareEngine::new();
        let mut view = engine.create_view(32, 16).unwrap();
        view.load_url("file:///x").unwrap();
        assert!(view.is_dirty());

        view.with_bitmap(&mut |bmp| {
            assert_eq!(bmp.width, 32);
            assert_eq!(bmp.height, 16);
            assert_eq!(bmp.pixels.len(), bmp.row_bytes * bmp.height as usize);
        });

        view.clear_dirty();
        assert!(!view.is_dirty());
    }

    #[test]
    fn same_size_resize_is_a_no_op() {
        let mut engine = SoftwareEngine::new();
        let mut view = engine.create_view(32, 16).unwrap();
        view.load_url("file:///x").unwrap();
        view.clear_dirty();

        view.resize(32, 16);
        assert!(!view.is_dirty());

        view.resize(48, 16);
        assert!(view.is_dirty());
        assert_eq!(view.size(), (48, 16));
    }
}
