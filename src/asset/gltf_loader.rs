//! glTF import
//!
//! Reads a `.gltf` or `.glb` file into CPU-side mesh data. Parsing is done by
//! the `gltf` crate; this module only flattens the node hierarchy, bakes node
//! transforms into vertex data, and converts base color textures to RGBA8.
//!
//! One `MeshData` is produced per triangle primitive.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gltf::image::Format;
use gltf::mesh::Mode;
use macroquad::math::{Mat4, Vec3};

use super::{MeshData, ModelData, TextureData};

/// Error type for model loading
#[derive(Debug)]
pub enum AssetError {
    /// File could not be read or parsed
    Import(gltf::Error),
    /// File parsed but contained no drawable triangles
    Empty(PathBuf),
    /// Image data we cannot turn into an RGBA8 texture
    Texture(String),
}

impl From<gltf::Error> for AssetError {
    fn from(e: gltf::Error) -> Self {
        AssetError::Import(e)
    }
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Import(e) => write!(f, "glTF import error: {}", e),
            AssetError::Empty(path) => write!(f, "No triangle meshes in {}", path.display()),
            AssetError::Texture(msg) => write!(f, "Texture error: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Import(e) => Some(e),
            _ => None,
        }
    }
}

/// Load a glTF model from disk.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelData, AssetError> {
    let path = path.as_ref();
    let (document, buffers, images) = gltf::import(path)?;

    // Image index -> texture index (unsupported images are left out)
    let mut textures = Vec::new();
    let mut texture_slots = HashMap::new();
    for (image_idx, image) in images.iter().enumerate() {
        match convert_image(image) {
            Ok(texture) => {
                texture_slots.insert(image_idx, textures.len());
                textures.push(texture);
            }
            Err(e) => log::warn!("{}: image {} skipped: {}", path.display(), image_idx, e),
        }
    }

    let mut importer = Importer {
        path,
        buffers: &buffers,
        texture_slots: &texture_slots,
        meshes: Vec::new(),
    };

    let scenes: Vec<gltf::Scene> = match document.default_scene() {
        Some(scene) => vec![scene],
        None => document.scenes().collect(),
    };

    if scenes.is_empty() {
        // No scene graph at all: take every mesh in its own space
        for mesh in document.meshes() {
            importer.read_mesh(&mesh, Mat4::IDENTITY);
        }
    } else {
        for scene in &scenes {
            for node in scene.nodes() {
                importer.visit(&node, Mat4::IDENTITY);
            }
        }
    }

    let meshes = importer.meshes;
    if meshes.is_empty() {
        return Err(AssetError::Empty(path.to_path_buf()));
    }

    Ok(ModelData { meshes, textures })
}

struct Importer<'a> {
    path: &'a Path,
    buffers: &'a [gltf::buffer::Data],
    texture_slots: &'a HashMap<usize, usize>,
    meshes: Vec<MeshData>,
}

impl Importer<'_> {
    fn visit(&mut self, node: &gltf::Node, parent: Mat4) {
        let local = Mat4::from_cols_array_2d(&node.transform().matrix());
        let world = parent * local;

        if let Some(mesh) = node.mesh() {
            self.read_mesh(&mesh, world);
        }
        for child in node.children() {
            self.visit(&child, world);
        }
    }

    fn read_mesh(&mut self, mesh: &gltf::Mesh, world: Mat4) {
        let normal_matrix = world.inverse().transpose();
        let buffers = self.buffers;

        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                log::warn!(
                    "{}: mesh {} primitive {} uses {:?}, only triangles are drawn",
                    self.path.display(), mesh.index(), primitive.index(), primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = match reader.read_positions() {
                Some(iter) => iter
                    .map(|p| world.transform_point3(Vec3::from_array(p)).to_array())
                    .collect(),
                None => {
                    log::warn!(
                        "{}: mesh {} primitive {} has no positions",
                        self.path.display(), mesh.index(), primitive.index()
                    );
                    continue;
                }
            };
            let count = positions.len();

            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(iter) => iter
                    .map(|n| {
                        normal_matrix
                            .transform_vector3(Vec3::from_array(n))
                            .normalize_or_zero()
                            .to_array()
                    })
                    .collect(),
                None => vec![[0.0; 3]; count],
            };

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|t| t.into_f32().collect())
                .unwrap_or_else(|| vec![[0.0; 2]; count]);

            let material = primitive.material();
            let pbr = material.pbr_metallic_roughness();
            let factor = pbr.base_color_factor();
            let colors: Vec<[u8; 4]> = reader
                .read_colors(0)
                .map(|c| c.into_rgba_u8().collect())
                .unwrap_or_else(|| vec![[255; 4]; count])
                .into_iter()
                .map(|c| tint_color(c, factor))
                .collect();

            let mut indices: Vec<u32> = reader
                .read_indices()
                .map(|i| i.into_u32().collect())
                .unwrap_or_else(|| (0..count as u32).collect());
            indices.truncate(indices.len() - indices.len() % 3);

            if let Some(bad) = indices.iter().find(|&&i| i as usize >= count) {
                log::warn!(
                    "{}: mesh {} primitive {} index {} out of range ({} vertices), skipped",
                    self.path.display(), mesh.index(), primitive.index(), bad, count
                );
                continue;
            }
            if indices.is_empty() || normals.len() != count || uvs.len() != count || colors.len() != count {
                log::warn!(
                    "{}: mesh {} primitive {} has mismatched attributes, skipped",
                    self.path.display(), mesh.index(), primitive.index()
                );
                continue;
            }

            let texture = pbr
                .base_color_texture()
                .and_then(|info| self.texture_slots.get(&info.texture().source().index()).copied());

            self.meshes.push(MeshData {
                positions,
                normals,
                uvs,
                colors,
                indices,
                texture,
            });
        }
    }
}

/// Multiply an 8-bit color by a linear RGBA factor.
fn tint_color(color: [u8; 4], factor: [f32; 4]) -> [u8; 4] {
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (color[i] as f32 * factor[i].clamp(0.0, 1.0)).round() as u8;
    }
    out
}

/// Convert decoded glTF image data into RGBA8.
fn convert_image(image: &gltf::image::Data) -> Result<TextureData, AssetError> {
    if image.width > u16::MAX as u32 || image.height > u16::MAX as u32 {
        return Err(AssetError::Texture(format!(
            "{}x{} exceeds the maximum texture size",
            image.width, image.height
        )));
    }

    let px = &image.pixels;
    let rgba: Vec<u8> = match image.format {
        Format::R8G8B8A8 => px.clone(),
        Format::R8G8B8 => px.chunks_exact(3).flat_map(|c| [c[0], c[1], c[2], 255]).collect(),
        Format::R8G8 => px.chunks_exact(2).flat_map(|c| [c[0], c[0], c[0], c[1]]).collect(),
        Format::R8 => px.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        // 16-bit little endian: keep the high byte
        Format::R16G16B16A16 => px.chunks_exact(8).flat_map(|c| [c[1], c[3], c[5], c[7]]).collect(),
        Format::R16G16B16 => px.chunks_exact(6).flat_map(|c| [c[1], c[3], c[5], 255]).collect(),
        other => {
            return Err(AssetError::Texture(format!("unsupported pixel format {:?}", other)));
        }
    };

    if rgba.len() != (image.width * image.height * 4) as usize {
        return Err(AssetError::Texture(format!(
            "pixel data size {} does not match {}x{}",
            rgba.len(), image.width, image.height
        )));
    }

    Ok(TextureData {
        width: image.width,
        height: image.height,
        rgba,
    })
}
