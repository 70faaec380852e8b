use std::collections::HashMap;

use oriel_engine::coords::Rect;
use oriel_engine::core::{App, AppControl, FrameCtx};
use oriel_engine::input::{InputEvent, Key, KeyState, ViewRouter};
use oriel_engine::render::{
    primitives, CompositeDraw, Compositor, Mesh, RenderComponent, WebTexture,
};
use oriel_engine::scene::SharedScene;
use oriel_engine::web::{ComponentSlot, WebSurface};

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Per-frame driver: routes input to the page, advances the web surface,
/// keeps one render component alive per script-declared slot, and
/// composites everything into the window.
pub struct ShellApp {
    surface: WebSurface,
    scene: SharedScene,
    router: ViewRouter,

    web_texture: WebTexture,
    compositor: Compositor,
    components: HashMap<String, RenderComponent>,
    current_mesh: Mesh,
    mesh_shader: Option<String>,

    /// Degrees of Y spin per second applied when no page script drives
    /// setRotation (the software backend runs none).
    auto_spin: f32,
    spin_angle: f32,
}

impl ShellApp {
    pub fn new(
        surface: WebSurface,
        scene: SharedScene,
        mesh_shader: Option<String>,
        auto_spin: f32,
    ) -> Self {
        let current_mesh = primitives::mesh_for(scene.borrow().primitive());
        Self {
            surface,
            scene,
            router: ViewRouter::new(Rect::default()),
            web_texture: WebTexture::new(),
            compositor: Compositor::new(),
            components: HashMap::new(),
            current_mesh,
            mesh_shader,
            auto_spin,
            spin_angle: 0.0,
        }
    }

    fn route_input(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        for ev in &ctx.input_frame.events {
            if let InputEvent::Key {
                key: Key::Escape,
                state: KeyState::Pressed,
                repeat: false,
                ..
            } = ev
            {
                return AppControl::Exit;
            }

            if let Some(view_ev) = self.router.route(ev) {
                self.surface.handle_event(view_ev);
            }
        }
        AppControl::Continue
    }
}

impl App for ShellApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.route_input(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        let (lw, lh) = ctx.window.logical_size();
        let scale = ctx.window.scale_factor();
        self.router.set_region(Rect::new(0.0, 0.0, lw, lh));
        self.surface.resize(lw.max(1.0) as u32, lh.max(1.0) as u32);

        if self.auto_spin > 0.0 {
            self.spin_angle = (self.spin_angle + self.auto_spin * ctx.time.dt) % 360.0;
            self.scene
                .borrow_mut()
                .set_rotation(self.spin_angle * 0.4, self.spin_angle, 0.0);
        }

        self.surface.update();
        self.surface.render();

        // Snapshot shared state so the render closure below only touches
        // locals and disjoint fields.
        let primitive_change = self.scene.borrow_mut().take_primitive_change();
        let transform = self.scene.borrow().model_matrix();
        let slot_list: Vec<(String, ComponentSlot)> = self
            .surface
            .slots()
            .borrow()
            .iter()
            .map(|(name, slot)| (name.to_owned(), slot))
            .collect();

        let Self {
            surface,
            web_texture,
            compositor,
            components,
            current_mesh,
            mesh_shader,
            ..
        } = self;

        ctx.render(|rctx, encoder, surface_view| {
            // web layer: upload freshly painted pixels
            if surface.is_dirty() {
                surface.with_bitmap(&mut |bitmap| web_texture.upload(rctx, bitmap));
                surface.clear_dirty();
            }

            // script changed the primitive: rebuild every panel's mesh
            if let Some(kind) = primitive_change {
                log::info!("primitive changed to {kind:?}");
                *current_mesh = primitives::mesh_for(kind);
                for component in components.values_mut() {
                    component.set_mesh(rctx, current_mesh, mesh_shader.as_deref());
                }
            }

            // one component per declared slot, sized to the slot
            for (name, slot) in &slot_list {
                let w = (slot.rect.w * scale).round().max(1.0) as u32;
                let h = (slot.rect.h * scale).round().max(1.0) as u32;

                let component = components.entry(name.clone()).or_insert_with(|| {
                    let mut c = RenderComponent::new(rctx.device, format!("panel {name}"), w, h);
                    c.set_mesh(rctx, current_mesh, mesh_shader.as_deref());
                    c
                });

                component.resize(rctx.device, w, h);
                component.set_transform(transform);
                if slot.visible {
                    component.render(rctx, encoder);
                }
            }

            // composite: web layer first, panels on top
            let (sw, sh) = rctx.surface_size;
            let mut draws: Vec<CompositeDraw<'_>> = Vec::new();

            if surface.is_available() {
                if let Some(view) = web_texture.view() {
                    draws.push(CompositeDraw {
                        view,
                        dst: Rect::new(0.0, 0.0, sw as f32, sh as f32),
                    });
                }
            }

            for (name, slot) in &slot_list {
                if !slot.visible {
                    continue;
                }
                let Some(component) = components.get(name) else {
                    continue;
                };
                draws.push(CompositeDraw {
                    view: component.color_view(),
                    dst: Rect::new(
                        slot.rect.x * scale,
                        slot.rect.y * scale,
                        slot.rect.w * scale,
                        slot.rect.h * scale,
                    ),
                });
            }

            compositor.composite(rctx, encoder, surface_view, BACKGROUND, &draws);
        })
    }
}
