//! Camera Module
//!
//! The camera is a component: its object's world transform is the eye, and
//! the component only carries projection parameters. Window-system agnostic;
//! the renderer uploads [`CameraUniform`] and is otherwise external.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::error::EngineResult;
use crate::scene::{ObjectId, Scene};

/// Perspective camera parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Width / height of the render target
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.01,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    pub fn new(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            near,
            far,
            ..Default::default()
        }
    }

    /// Update the aspect ratio after a resize. Ignores degenerate sizes.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Left-handed perspective projection (+Z into the screen).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn uniform(&self, view: Mat4) -> CameraUniform {
        CameraUniform {
            view_proj: (self.projection() * view).to_cols_array_2d(),
        }
    }
}

/// View matrix of the camera-bearing object `id`.
pub fn view_matrix(scene: &Scene, id: ObjectId) -> EngineResult<Mat4> {
    let eye = scene.world_position(id)?;
    let forward = scene.forward(id)?;
    let up = scene.up(id)?;
    Ok(Mat4::look_to_lh(eye, forward, up))
}

/// GPU-side camera data for the camera on `id`.
pub fn camera_uniform(scene: &Scene, id: ObjectId) -> EngineResult<CameraUniform> {
    let camera = scene.require_component::<Camera>(id)?;
    Ok(camera.uniform(view_matrix(scene, id)?))
}

/// Camera uniform buffer. Must match the WGSL struct layout exactly.
///
/// WGSL layout (64 bytes):
///   offset 0: view_proj (mat4x4<f32>) = 64 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

static_assertions::assert_eq_size!(CameraUniform, [u8; 64]);
