//! macroquad backend
//!
//! Uploads `ModelData` into macroquad meshes and draws them with a model
//! matrix. Tinting is baked into vertex colors and only redone when the tint
//! changes.

use macroquad::color::{Color, WHITE};
use macroquad::math::{Vec2, Vec3};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::texture::{FilterMode, Texture2D};
use macroquad::window::get_internal_gl;

use super::RenderBackend;
use crate::asset::ModelData;
use crate::scene::Transform;

/// A model living on the GPU.
pub struct GpuModel {
    meshes: Vec<Mesh>,
    /// Untinted vertex colors, parallel to `meshes[i].vertices`
    base_colors: Vec<Vec<[u8; 4]>>,
    applied_tint: Color,
}

impl GpuModel {
    /// Upload CPU model data. Needs a live macroquad context.
    pub fn upload(data: &ModelData) -> Self {
        let textures: Vec<Texture2D> = data
            .textures
            .iter()
            .map(|t| {
                let texture = Texture2D::from_rgba8(t.width as u16, t.height as u16, &t.rgba);
                texture.set_filter(FilterMode::Linear);
                texture
            })
            .collect();

        let mut meshes = Vec::new();
        let mut base_colors = Vec::new();

        for mesh in &data.meshes {
            for batch in mesh.draw_batches() {
                let vertices: Vec<Vertex> = (0..batch.vertex_count())
                    .map(|i| {
                        let [r, g, b, a] = batch.colors[i];
                        Vertex::new2(
                            Vec3::from_array(batch.positions[i]),
                            Vec2::from_array(batch.uvs[i]),
                            Color::from_rgba(r, g, b, a),
                        )
                    })
                    .collect();

                base_colors.push(batch.colors.clone());
                meshes.push(Mesh {
                    vertices,
                    indices: batch.indices.iter().map(|&i| i as u16).collect(),
                    texture: batch.texture.and_then(|i| textures.get(i).cloned()),
                });
            }
        }

        Self {
            meshes,
            base_colors,
            applied_tint: WHITE,
        }
    }

    /// Number of GPU meshes (batches) in this model.
    pub fn batch_count(&self) -> usize {
        self.meshes.len()
    }

    fn apply_tint(&mut self, tint: Color) {
        if self.applied_tint == tint {
            return;
        }
        for (mesh, colors) in self.meshes.iter_mut().zip(&self.base_colors) {
            for (vertex, base) in mesh.vertices.iter_mut().zip(colors) {
                vertex.color = tint_bytes(*base, tint);
            }
        }
        self.applied_tint = tint;
    }
}

/// Multiply 8-bit vertex color by a tint.
fn tint_bytes(base: [u8; 4], tint: Color) -> [u8; 4] {
    let t = [tint.r, tint.g, tint.b, tint.a];
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (base[i] as f32 * t[i].clamp(0.0, 1.0)).round() as u8;
    }
    out
}

/// Immediate-mode renderer on top of macroquad's 3D drawing.
#[derive(Default)]
pub struct MacroquadRenderer;

impl MacroquadRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RenderBackend for MacroquadRenderer {
    type Model = GpuModel;

    fn draw_model(&mut self, model: &mut GpuModel, transform: &Transform, tint: Color) {
        model.apply_tint(tint);

        unsafe {
            get_internal_gl().quad_gl.push_model_matrix(transform.matrix());
        }
        for mesh in &model.meshes {
            draw_mesh(mesh);
        }
        unsafe {
            get_internal_gl().quad_gl.pop_model_matrix();
        }
    }

    fn release_model(&mut self, model: GpuModel) {
        log::debug!("Releasing model ({} GPU meshes)", model.batch_count());
        // Textures are reference counted and freed when the last mesh drops
        drop(model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_bytes() {
        assert_eq!(tint_bytes([200, 100, 50, 255], WHITE), [200, 100, 50, 255]);
        assert_eq!(
            tint_bytes([200, 100, 50, 255], Color::new(0.5, 0.0, 1.0, 0.5)),
            [100, 0, 50, 128]
        );
    }
}
