//! Model Assets
//!
//! CPU-side model data, independent of any GPU or window:
//!
//! ```text
//! ModelData
//! ├── meshes: Vec<MeshData>     // one per glTF triangle primitive
//! │   ├── positions / normals / uvs / colors (same length)
//! │   ├── indices: Vec<u32>     // triangle list
//! │   └── texture: Option<usize> -> textures[i]
//! └── textures: Vec<TextureData> // RGBA8
//! ```
//!
//! Node transforms are already baked in, so a model only needs the object's
//! own transform to be drawn.

mod gltf_loader;

pub use gltf_loader::{load_model, AssetError};

use std::collections::HashMap;

/// Vertices per draw batch. macroquad clamps any draw call reaching its
/// default capacity of 10000 vertices, so stay strictly below it.
pub const MAX_BATCH_VERTICES: usize = 9_999;

/// Indices per draw batch: whole triangles below macroquad's default
/// capacity of 5000 indices.
pub const MAX_BATCH_INDICES: usize = 4_998;

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// One triangle mesh with per-vertex attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[u8; 4]>,
    pub indices: Vec<u32>,
    /// Index into `ModelData::textures`
    pub texture: Option<usize>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Split into meshes that fit a single macroquad draw call.
    ///
    /// Triangles keep their order. Vertices shared across a batch boundary
    /// are duplicated. A mesh that already fits is returned as one batch.
    pub fn draw_batches(&self) -> Vec<MeshData> {
        if self.vertex_count() <= MAX_BATCH_VERTICES && self.indices.len() <= MAX_BATCH_INDICES {
            return vec![self.clone()];
        }

        let mut batches = Vec::new();
        let mut batch = self.empty_like();
        // Old vertex index -> index within current batch
        let mut remap: HashMap<u32, u32> = HashMap::new();

        for tri in self.indices.chunks_exact(3) {
            let new_verts = tri.iter().filter(|&&i| !remap.contains_key(&i)).count();
            if batch.vertex_count() + new_verts > MAX_BATCH_VERTICES
                || batch.indices.len() + 3 > MAX_BATCH_INDICES
            {
                batches.push(std::mem::replace(&mut batch, self.empty_like()));
                remap.clear();
            }

            for &old in tri {
                let new = match remap.get(&old) {
                    Some(&idx) => idx,
                    None => {
                        let idx = batch.vertex_count() as u32;
                        let o = old as usize;
                        batch.positions.push(self.positions[o]);
                        batch.normals.push(self.normals[o]);
                        batch.uvs.push(self.uvs[o]);
                        batch.colors.push(self.colors[o]);
                        remap.insert(old, idx);
                        idx
                    }
                };
                batch.indices.push(new);
            }
        }

        if !batch.indices.is_empty() {
            batches.push(batch);
        }
        batches
    }

    fn empty_like(&self) -> MeshData {
        MeshData {
            texture: self.texture,
            ..Default::default()
        }
    }
}

/// A loaded model: meshes plus the textures they reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub textures: Vec<TextureData>,
}

impl ModelData {
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(MeshData::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }
}
