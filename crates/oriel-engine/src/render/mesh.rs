use anyhow::{bail, Result};
use bytemuck::{Pod, Zeroable};

/// Vertex format shared by all component meshes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self { position, color, tex_coord }
    }

    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU-side indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Checks the mesh is drawable: non-empty, whole triangles, and every
    /// index in range.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            bail!("mesh is empty");
        }
        if self.indices.len() % 3 != 0 {
            bail!("index count {} is not a multiple of 3", self.indices.len());
        }
        let max = self.vertices.len() as u32;
        if let Some(bad) = self.indices.iter().find(|&&i| i >= max) {
            bail!("index {bad} out of range (mesh has {max} vertices)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vertex {
        Vertex::new([x, y, 0.0], [1.0, 1.0, 1.0], [0.0, 0.0])
    }

    #[test]
    fn valid_triangle_passes() {
        let mesh = Mesh::new(vec![v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)], vec![0, 1, 2]);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        assert!(Mesh::default().validate().is_err());
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let mesh = Mesh::new(vec![v(0.0, 0.0), v(1.0, 0.0)], vec![0, 1]);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mesh = Mesh::new(vec![v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)], vec![0, 1, 3]);
        assert!(mesh.validate().is_err());
    }
}
