//! GPU rendering subsystem.
//!
//! Components render into offscreen color+depth targets; the compositor
//! then places each target (and the web layer's texture) onto the window
//! surface as textured quads, back-to-front.
//!
//! Each piece owns its GPU resources; pipelines are created lazily and
//! keyed on the surface format.

mod component;
mod compositor;
mod ctx;
mod mesh;
pub mod primitives;
mod target;
mod web_texture;

pub use component::{ComponentContent, RenderComponent, DEFAULT_MESH_SHADER};
pub use compositor::{CompositeDraw, Compositor};
pub use ctx::RenderCtx;
pub use mesh::{Mesh, Vertex};
pub use target::{OffscreenTarget, DEPTH_FORMAT, OFFSCREEN_FORMAT};
pub use web_texture::{WebTexture, WEB_TEXTURE_FORMAT};
