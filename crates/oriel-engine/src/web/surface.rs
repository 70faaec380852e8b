use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Context};

use crate::bridge::{BridgeRegistry, ScriptValue};

use super::slots::{SharedSlots, SlotMap};
use super::view::{BitmapData, ConsoleLevel, ViewEvent, ViewNotice, WebEngine, WebView};

/// Lifecycle of the web surface.
///
/// Transitions only move forward: `Uninitialized → Initialized → Shutdown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceState {
    Uninitialized,
    Initialized,
    Shutdown,
}

/// The embedded page and everything attached to it: the engine-backed view,
/// the bridge function registry, and the component slot table page script
/// writes into.
///
/// All entry points are state-checked: before [`initialize`](Self::initialize)
/// and after [`shutdown`](Self::shutdown), per-frame calls are silent no-ops
/// rather than errors, so the frame loop never has to order itself around
/// the surface's lifecycle.
pub struct WebSurface {
    state: SurfaceState,
    engine: Box<dyn WebEngine>,
    view: Option<Box<dyn WebView>>,
    registry: BridgeRegistry,
    slots: SharedSlots,
}

impl WebSurface {
    pub fn new(engine: Box<dyn WebEngine>) -> Self {
        Self {
            state: SurfaceState::Uninitialized,
            engine,
            view: None,
            registry: BridgeRegistry::new(),
            slots: Rc::new(RefCell::new(SlotMap::new())),
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// True once initialized and not yet shut down; the compositor skips the
    /// web layer entirely while this is false.
    pub fn is_available(&self) -> bool {
        self.state == SurfaceState::Initialized && self.view.is_some()
    }

    /// Registry of native functions exposed to page script. Register before
    /// [`initialize`](Self::initialize); later registrations only reach the
    /// page after its next navigation.
    pub fn registry_mut(&mut self) -> &mut BridgeRegistry {
        &mut self.registry
    }

    /// Shared handle to the slot table, for bridge callbacks and the frame
    /// loop.
    pub fn slots(&self) -> SharedSlots {
        Rc::clone(&self.slots)
    }

    /// Creates the view at the given size. One-shot: a second call is
    /// rejected and logged, leaving the existing view untouched.
    pub fn initialize(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        match self.state {
            SurfaceState::Initialized => {
                log::error!("web surface initialized twice; ignoring");
                bail!("web surface is already initialized");
            }
            SurfaceState::Shutdown => bail!("web surface was shut down"),
            SurfaceState::Uninitialized => {}
        }

        let mut view = self
            .engine
            .create_view(width.max(1), height.max(1))
            .context("creating web view")?;
        self.registry.bind_to_context(view.script_context());

        self.view = Some(view);
        self.state = SurfaceState::Initialized;
        log::info!("web surface initialized at {width}x{height}");
        Ok(())
    }

    pub fn load_url(&mut self, url: &str) -> anyhow::Result<()> {
        let Some(view) = self.view.as_mut() else {
            bail!("web surface is not initialized");
        };
        log::info!("loading {url}");
        view.load_url(url)
    }

    /// Advances the engine and reacts to view notifications. No-op unless
    /// initialized.
    pub fn update(&mut self) {
        if self.state != SurfaceState::Initialized {
            return;
        }
        self.engine.update();

        let Some(view) = self.view.as_mut() else {
            return;
        };
        let notices = view.drain_notices();
        for notice in notices {
            match notice {
                ViewNotice::LoadBegan { url } => log::debug!("load began: {url}"),
                ViewNotice::LoadFinished { url } => log::info!("load finished: {url}"),
                ViewNotice::LoadFailed { url, description } => {
                    log::error!("load failed: {url}: {description}");
                }
                ViewNotice::DomReady => {
                    // Navigation created a fresh script context; the bridge
                    // bindings do not survive it.
                    log::debug!("dom ready, re-binding bridge");
                    self.registry.bind_to_context(view.script_context());
                }
                ViewNotice::Console { level, message, source, line } => {
                    let target = format!("{source}:{line}");
                    match level {
                        ConsoleLevel::Debug => log::debug!("[page {target}] {message}"),
                        ConsoleLevel::Log | ConsoleLevel::Info => {
                            log::info!("[page {target}] {message}");
                        }
                        ConsoleLevel::Warning => log::warn!("[page {target}] {message}"),
                        ConsoleLevel::Error => log::error!("[page {target}] {message}"),
                    }
                }
            }
        }
    }

    /// Paints dirty views. No-op unless initialized.
    pub fn render(&mut self) {
        if self.state != SurfaceState::Initialized {
            return;
        }
        self.engine.render();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(view) = self.view.as_mut() {
            view.resize(width, height);
        }
    }

    /// Forwards a routed input event to the view. Dropped when unavailable.
    pub fn handle_event(&mut self, event: ViewEvent) {
        if self.state != SurfaceState::Initialized {
            return;
        }
        if let Some(view) = self.view.as_mut() {
            view.fire_event(event);
        }
    }

    pub fn eval_script(&mut self, source: &str) -> ScriptValue {
        match self.view.as_mut() {
            Some(view) => view.eval_script(source),
            None => ScriptValue::Null,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.view.as_ref().is_some_and(|v| v.is_dirty())
    }

    pub fn clear_dirty(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.clear_dirty();
        }
    }

    pub fn with_bitmap(&mut self, f: &mut dyn FnMut(&BitmapData<'_>)) {
        if let Some(view) = self.view.as_mut() {
            view.with_bitmap(f);
        }
    }

    /// Releases the view. Terminal: the surface cannot be re-initialized.
    pub fn shutdown(&mut self) {
        if self.state == SurfaceState::Shutdown {
            return;
        }
        self.view = None;
        self.state = SurfaceState::Shutdown;
        log::info!("web surface shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ScriptArgs;
    use crate::coords::Rect;
    use crate::web::slots::ComponentSlot;
    use crate::web::software::SoftwareEngine;

    fn surface_with_context() -> (WebSurface, crate::web::software::SoftwareScriptContext) {
        let engine = SoftwareEngine::new();
        let ctx = engine.context_handle();
        (WebSurface::new(Box::new(engine)), ctx)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn starts_uninitialized_and_unavailable() {
        let (surface, _) = surface_with_context();
        assert_eq!(surface.state(), SurfaceState::Uninitialized);
        assert!(!surface.is_available());
    }

    #[test]
    fn update_and_render_before_init_are_no_ops() {
        let (mut surface, _) = surface_with_context();
        surface.update();
        surface.render();
        assert!(!surface.is_dirty());
    }

    #[test]
    fn double_initialize_is_rejected() {
        let (mut surface, _) = surface_with_context();
        surface.initialize(640, 480).unwrap();
        assert!(surface.initialize(640, 480).is_err());
        // First initialization survives.
        assert!(surface.is_available());
    }

    #[test]
    fn shutdown_is_terminal() {
        let (mut surface, _) = surface_with_context();
        surface.initialize(640, 480).unwrap();
        surface.shutdown();
        assert_eq!(surface.state(), SurfaceState::Shutdown);
        assert!(!surface.is_available());
        assert!(surface.initialize(640, 480).is_err());
        // Frame-loop calls stay harmless.
        surface.update();
        surface.render();
    }

    // ── bridge binding ────────────────────────────────────────────────────

    #[test]
    fn registered_functions_are_callable_after_initialize() {
        let (mut surface, ctx) = surface_with_context();
        surface
            .registry_mut()
            .register("ping", |_| ScriptValue::Str("pong".into()));
        surface.initialize(640, 480).unwrap();

        assert_eq!(
            ctx.call("native", "ping", &ScriptArgs::default()),
            ScriptValue::Str("pong".into())
        );
    }

    #[test]
    fn dom_ready_rebinds_the_registry() {
        let (mut surface, ctx) = surface_with_context();
        surface.initialize(640, 480).unwrap();

        // Registered after initialize: only reaches the page once a
        // navigation produces a DomReady.
        surface
            .registry_mut()
            .register("late", |_| ScriptValue::Bool(true));
        surface.load_url("file:///demo/index.html").unwrap();
        surface.update();

        assert_eq!(
            ctx.call("native", "late", &ScriptArgs::default()),
            ScriptValue::Bool(true)
        );
    }

    // ── slots + pixels ────────────────────────────────────────────────────

    #[test]
    fn slot_handle_is_shared() {
        let (surface, _) = surface_with_context();
        let writer = surface.slots();
        writer
            .borrow_mut()
            .set("panel", ComponentSlot::new(Rect::new(1.0, 2.0, 3.0, 4.0), true));
        assert_eq!(surface.slots().borrow().len(), 1);
    }

    #[test]
    fn dirty_pixels_flow_through_the_surface() {
        let (mut surface, _) = surface_with_context();
        surface.initialize(64, 32).unwrap();
        surface.load_url("file:///x").unwrap();
        assert!(surface.is_dirty());

        let mut seen = (0, 0);
        surface.with_bitmap(&mut |bmp| seen = (bmp.width, bmp.height));
        assert_eq!(seen, (64, 32));

        surface.clear_dirty();
        assert!(!surface.is_dirty());
    }
}
