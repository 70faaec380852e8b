//! Built-in mesh generators for the script-selectable primitives.
//!
//! All shapes fit a unit half-extent (±0.5) box centered at the origin, with
//! per-face vertex colors so unlit rendering still reads as 3D.

use crate::scene::PrimitiveKind;

use super::mesh::{Mesh, Vertex};

/// Segment count for the round shapes.
const SEGMENTS: u32 = 32;

pub fn mesh_for(kind: PrimitiveKind) -> Mesh {
    match kind {
        PrimitiveKind::Cube => cube(),
        PrimitiveKind::Pyramid => pyramid(),
        PrimitiveKind::Cylinder => cylinder(),
        PrimitiveKind::Cone => cone(),
    }
}

fn v(p: [f32; 3], c: [f32; 3], t: [f32; 2]) -> Vertex {
    Vertex::new(p, c, t)
}

/// Axis-aligned cube, one color family per face.
pub fn cube() -> Mesh {
    #[rustfmt::skip]
    let vertices = vec![
        // front (red), z = +0.5
        v([-0.5, -0.5,  0.5], [1.0, 0.3, 0.3], [0.0, 0.0]),
        v([ 0.5, -0.5,  0.5], [1.0, 0.3, 0.3], [1.0, 0.0]),
        v([ 0.5,  0.5,  0.5], [1.0, 0.5, 0.5], [1.0, 1.0]),
        v([-0.5,  0.5,  0.5], [1.0, 0.5, 0.5], [0.0, 1.0]),
        // back (green), z = -0.5
        v([-0.5, -0.5, -0.5], [0.3, 1.0, 0.3], [1.0, 0.0]),
        v([-0.5,  0.5, -0.5], [0.5, 1.0, 0.5], [1.0, 1.0]),
        v([ 0.5,  0.5, -0.5], [0.5, 1.0, 0.5], [0.0, 1.0]),
        v([ 0.5, -0.5, -0.5], [0.3, 1.0, 0.3], [0.0, 0.0]),
        // top (blue), y = +0.5
        v([-0.5,  0.5, -0.5], [0.3, 0.3, 1.0], [0.0, 1.0]),
        v([-0.5,  0.5,  0.5], [0.3, 0.3, 1.0], [0.0, 0.0]),
        v([ 0.5,  0.5,  0.5], [0.5, 0.5, 1.0], [1.0, 0.0]),
        v([ 0.5,  0.5, -0.5], [0.5, 0.5, 1.0], [1.0, 1.0]),
        // bottom (yellow), y = -0.5
        v([-0.5, -0.5, -0.5], [1.0, 1.0, 0.3], [0.0, 0.0]),
        v([ 0.5, -0.5, -0.5], [1.0, 1.0, 0.3], [1.0, 0.0]),
        v([ 0.5, -0.5,  0.5], [1.0, 1.0, 0.5], [1.0, 1.0]),
        v([-0.5, -0.5,  0.5], [1.0, 1.0, 0.5], [0.0, 1.0]),
        // right (magenta), x = +0.5
        v([ 0.5, -0.5, -0.5], [1.0, 0.3, 1.0], [1.0, 0.0]),
        v([ 0.5,  0.5, -0.5], [1.0, 0.5, 1.0], [1.0, 1.0]),
        v([ 0.5,  0.5,  0.5], [1.0, 0.5, 1.0], [0.0, 1.0]),
        v([ 0.5, -0.5,  0.5], [1.0, 0.3, 1.0], [0.0, 0.0]),
        // left (cyan), x = -0.5
        v([-0.5, -0.5, -0.5], [0.3, 1.0, 1.0], [0.0, 0.0]),
        v([-0.5, -0.5,  0.5], [0.3, 1.0, 1.0], [1.0, 0.0]),
        v([-0.5,  0.5,  0.5], [0.5, 1.0, 1.0], [1.0, 1.0]),
        v([-0.5,  0.5, -0.5], [0.5, 1.0, 1.0], [0.0, 1.0]),
    ];

    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 2, 3, 0,       // front
        4, 5, 6, 6, 7, 4,       // back
        8, 9, 10, 10, 11, 8,    // top
        12, 13, 14, 14, 15, 12, // bottom
        16, 17, 18, 18, 19, 16, // right
        20, 21, 22, 22, 23, 20, // left
    ];

    Mesh::new(vertices, indices)
}

/// Square-base pyramid with an apex at +Y.
pub fn pyramid() -> Mesh {
    let apex = [0.0, 0.5, 0.0];
    let base = [
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, -0.5, -0.5],
        [-0.5, -0.5, -0.5],
    ];
    let side_colors = [
        [1.0, 0.3, 0.3],
        [0.3, 1.0, 0.3],
        [0.3, 0.3, 1.0],
        [1.0, 1.0, 0.3],
    ];

    let mut vertices = Vec::with_capacity(16);
    let mut indices = Vec::with_capacity(18);

    // four sides, apex duplicated per face for flat colors
    for (i, color) in side_colors.iter().enumerate() {
        let a = base[i];
        let b = base[(i + 1) % 4];
        let start = vertices.len() as u32;
        vertices.push(v(a, *color, [0.0, 0.0]));
        vertices.push(v(b, *color, [1.0, 0.0]));
        vertices.push(v(apex, *color, [0.5, 1.0]));
        indices.extend_from_slice(&[start, start + 1, start + 2]);
    }

    // base (two triangles, magenta)
    let base_color = [1.0, 0.3, 1.0];
    let start = vertices.len() as u32;
    for (i, p) in base.iter().enumerate() {
        let uv = [(i == 1 || i == 2) as u8 as f32, (i >= 2) as u8 as f32];
        vertices.push(v(*p, base_color, uv));
    }
    indices.extend_from_slice(&[start, start + 2, start + 1, start, start + 3, start + 2]);

    Mesh::new(vertices, indices)
}

/// Y-axis cylinder: triangle-fan caps plus a quad strip wall.
pub fn cylinder() -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let r = 0.5f32;

    // caps
    for (cy, color, flip) in [
        (0.5, [0.3, 0.3, 1.0], false),
        (-0.5, [1.0, 1.0, 0.3], true),
    ] {
        let center = vertices.len() as u32;
        vertices.push(v([0.0, cy, 0.0], color, [0.5, 0.5]));
        for i in 0..SEGMENTS {
            let a = angle(i);
            vertices.push(v(
                [r * a.cos(), cy, r * a.sin()],
                color,
                [0.5 + 0.5 * a.cos(), 0.5 + 0.5 * a.sin()],
            ));
        }
        for i in 0..SEGMENTS {
            let cur = center + 1 + i;
            let next = center + 1 + (i + 1) % SEGMENTS;
            if flip {
                indices.extend_from_slice(&[center, cur, next]);
            } else {
                indices.extend_from_slice(&[center, next, cur]);
            }
        }
    }

    // wall, color varying around the circumference
    let wall = vertices.len() as u32;
    for i in 0..SEGMENTS {
        let a = angle(i);
        let (x, z) = (r * a.cos(), r * a.sin());
        let color = ring_color(i);
        let u = i as f32 / SEGMENTS as f32;
        vertices.push(v([x, 0.5, z], color, [u, 0.0]));
        vertices.push(v([x, -0.5, z], color, [u, 1.0]));
    }
    for i in 0..SEGMENTS {
        let a = wall + 2 * i;
        let b = wall + 2 * ((i + 1) % SEGMENTS);
        indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
    }

    Mesh::new(vertices, indices)
}

/// Y-axis cone: base fan plus a triangle skirt to the apex.
pub fn cone() -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let r = 0.5f32;

    // base cap, facing -Y
    let base_color = [1.0, 1.0, 0.3];
    let center = vertices.len() as u32;
    vertices.push(v([0.0, -0.5, 0.0], base_color, [0.5, 0.5]));
    for i in 0..SEGMENTS {
        let a = angle(i);
        vertices.push(v(
            [r * a.cos(), -0.5, r * a.sin()],
            base_color,
            [0.5 + 0.5 * a.cos(), 0.5 + 0.5 * a.sin()],
        ));
    }
    for i in 0..SEGMENTS {
        let cur = center + 1 + i;
        let next = center + 1 + (i + 1) % SEGMENTS;
        indices.extend_from_slice(&[center, cur, next]);
    }

    // skirt, apex duplicated per segment
    let skirt = vertices.len() as u32;
    for i in 0..SEGMENTS {
        let a = angle(i);
        let color = ring_color(i);
        let u = i as f32 / SEGMENTS as f32;
        vertices.push(v([r * a.cos(), -0.5, r * a.sin()], color, [u, 1.0]));
        vertices.push(v([0.0, 0.5, 0.0], color, [u, 0.0]));
    }
    for i in 0..SEGMENTS {
        let a = skirt + 2 * i;
        let b = skirt + 2 * ((i + 1) % SEGMENTS);
        indices.extend_from_slice(&[a, a + 1, b]);
    }

    Mesh::new(vertices, indices)
}

fn angle(i: u32) -> f32 {
    i as f32 / SEGMENTS as f32 * std::f32::consts::TAU
}

fn ring_color(i: u32) -> [f32; 3] {
    let t = i as f32 / SEGMENTS as f32;
    [0.4 + 0.6 * t, 0.4, 1.0 - 0.6 * t]
}
