mod app;

use std::path::Path;

use anyhow::Result;
use winit::dpi::LogicalSize;

use oriel_engine::bridge::{ScriptArgs, ScriptValue};
use oriel_engine::coords::Rect;
use oriel_engine::device::GpuInit;
use oriel_engine::logging::{init_logging, LoggingConfig};
use oriel_engine::scene::{PrimitiveKind, SceneState};
use oriel_engine::web::software::SoftwareEngine;
use oriel_engine::web::{ComponentSlot, WebSurface};
use oriel_engine::window::{Runtime, RuntimeConfig};

use app::ShellApp;

const PAGE_ENTRY: &str = "app/build/index.html";
const MESH_SHADER_PATH: &str = "assets/mesh.wgsl";
const INITIAL_WIDTH: f64 = 1280.0;
const INITIAL_HEIGHT: f64 = 720.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // Asset paths are relative to the executable, not the launch directory.
    chdir_to_exe_dir();

    let page_url = resolve_page_url();
    let mesh_shader = load_mesh_shader();

    let scene = SceneState::shared();
    let engine = SoftwareEngine::new();
    let mut surface = WebSurface::new(Box::new(engine));
    register_bridge(&mut surface, &scene);

    surface.initialize(INITIAL_WIDTH as u32, INITIAL_HEIGHT as u32)?;
    surface.load_url(&page_url)?;

    // The software backend runs no page script, so nothing would place a
    // panel or animate it; seed one slot and spin it from the shell.
    surface.slots().borrow_mut().set(
        "viewer",
        ComponentSlot::new(Rect::new(700.0, 80.0, 480.0, 480.0), true),
    );

    let app = ShellApp::new(surface, scene, mesh_shader, 45.0);

    Runtime::run(
        RuntimeConfig {
            title: "oriel".to_string(),
            initial_size: LogicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT),
        },
        GpuInit::default(),
        app,
    )
}

/// Installs the `window.native.*` functions the page calls.
fn register_bridge(surface: &mut WebSurface, scene: &oriel_engine::scene::SharedScene) {
    // Take the slot handle first; `registry_mut` holds the surface borrow.
    let slots = surface.slots();
    let registry = surface.registry_mut();

    {
        registry.register("setComponentSlot", move |args: &ScriptArgs| {
            let (Some(name), Some(x), Some(y), Some(w), Some(h), Some(visible)) = (
                args.str_at(0),
                args.f32_at(1),
                args.f32_at(2),
                args.f32_at(3),
                args.f32_at(4),
                args.bool_at(5),
            ) else {
                log::error!("setComponentSlot: bad arguments");
                return ScriptValue::Null;
            };

            slots
                .borrow_mut()
                .set(name, ComponentSlot::new(Rect::new(x, y, w, h), visible));
            ScriptValue::Null
        });
    }

    {
        let scene = scene.clone();
        registry.register("setRotation", move |args: &ScriptArgs| {
            let (Some(rx), Some(ry), Some(rz)) =
                (args.f32_at(0), args.f32_at(1), args.f32_at(2))
            else {
                log::error!("setRotation: bad arguments");
                return ScriptValue::Null;
            };
            scene.borrow_mut().set_rotation(rx, ry, rz);
            ScriptValue::Null
        });
    }

    {
        let scene = scene.clone();
        registry.register("setPrimitive", move |args: &ScriptArgs| {
            let Some(name) = args.str_at(0) else {
                log::error!("setPrimitive: bad arguments");
                return ScriptValue::Null;
            };
            match name.parse::<PrimitiveKind>() {
                Ok(kind) => scene.borrow_mut().set_primitive(kind),
                Err(err) => log::error!("setPrimitive: {err}"),
            }
            ScriptValue::Null
        });
    }
}

/// Moves the working directory next to the executable. Best-effort: a
/// failure is logged and startup continues from the launch directory.
fn chdir_to_exe_dir() {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));

    match exe_dir {
        Some(dir) => {
            if let Err(err) = std::env::set_current_dir(&dir) {
                log::warn!("could not enter executable directory {}: {err}", dir.display());
            }
        }
        None => log::warn!("could not resolve executable directory"),
    }
}

fn resolve_page_url() -> String {
    let page = Path::new(PAGE_ENTRY);
    if !page.exists() {
        log::warn!("page entry point {PAGE_ENTRY} not found; the web layer will stay blank");
    }

    match page.canonicalize() {
        Ok(abs) => format!("file://{}", abs.display()),
        Err(_) => format!("file:///{PAGE_ENTRY}"),
    }
}

fn load_mesh_shader() -> Option<String> {
    match std::fs::read_to_string(MESH_SHADER_PATH) {
        Ok(source) => Some(source),
        Err(err) => {
            log::info!("{MESH_SHADER_PATH} not loaded ({err}); using the built-in mesh shader");
            None
        }
    }
}
