//! Shared demo-scene state.
//!
//! Bridge callbacks write here, the frame loop reads. Everything runs on one
//! thread, so the shared handle is `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

/// Shape shown in the 3D panel.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PrimitiveKind {
    #[default]
    Cube,
    Pyramid,
    Cylinder,
    Cone,
}

impl FromStr for PrimitiveKind {
    type Err = UnknownPrimitive;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cube" => Ok(PrimitiveKind::Cube),
            "pyramid" => Ok(PrimitiveKind::Pyramid),
            "cylinder" => Ok(PrimitiveKind::Cylinder),
            "cone" => Ok(PrimitiveKind::Cone),
            _ => Err(UnknownPrimitive(s.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct UnknownPrimitive(pub String);

impl std::fmt::Display for UnknownPrimitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown primitive: {}", self.0)
    }
}

impl std::error::Error for UnknownPrimitive {}

/// Script-controlled scene parameters.
#[derive(Debug, Default)]
pub struct SceneState {
    primitive: PrimitiveKind,
    rotation: [f32; 3],
    primitive_dirty: bool,
}

pub type SharedScene = Rc<RefCell<SceneState>>;

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedScene {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn primitive(&self) -> PrimitiveKind {
        self.primitive
    }

    /// Euler rotation in degrees, applied X then Y then Z.
    pub fn rotation(&self) -> [f32; 3] {
        self.rotation
    }

    pub fn set_primitive(&mut self, kind: PrimitiveKind) {
        if kind != self.primitive {
            self.primitive = kind;
            self.primitive_dirty = true;
        }
    }

    pub fn set_rotation(&mut self, rx: f32, ry: f32, rz: f32) {
        self.rotation = [rx, ry, rz];
    }

    /// Returns the new primitive if it changed since the last call, so the
    /// frame loop rebuilds mesh buffers only when needed.
    pub fn take_primitive_change(&mut self) -> Option<PrimitiveKind> {
        if self.primitive_dirty {
            self.primitive_dirty = false;
            Some(self.primitive)
        } else {
            None
        }
    }

    /// Column-major model matrix for the current rotation.
    pub fn model_matrix(&self) -> [[f32; 4]; 4] {
        let [rx, ry, rz] = self.rotation;
        rotation_xyz(rx.to_radians(), ry.to_radians(), rz.to_radians())
    }
}

/// 4×4 identity, column-major.
pub fn mat4_identity() -> [[f32; 4]; 4] {
    let mut m = [[0.0; 4]; 4];
    for (i, col) in m.iter_mut().enumerate() {
        col[i] = 1.0;
    }
    m
}

/// `a * b`, both column-major.
pub fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    let mut out = [[0.0; 4]; 4];
    for (c, col) in out.iter_mut().enumerate() {
        for (r, v) in col.iter_mut().enumerate() {
            *v = (0..4).map(|k| a[k][r] * b[c][k]).sum();
        }
    }
    out
}

/// Rotation about X, then Y, then Z (angles in radians), column-major.
pub fn rotation_xyz(rx: f32, ry: f32, rz: f32) -> [[f32; 4]; 4] {
    let (sx, cx) = rx.sin_cos();
    let (sy, cy) = ry.sin_cos();
    let (sz, cz) = rz.sin_cos();

    let mx = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, cx, sx, 0.0],
        [0.0, -sx, cx, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    let my = [
        [cy, 0.0, -sy, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [sy, 0.0, cy, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    let mz = [
        [cz, sz, 0.0, 0.0],
        [-sz, cz, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    mat4_mul(mz, mat4_mul(my, mx))
}
