//! CPU-side mesh parsing. Everything here produces [`MeshData`], which
//! knows its bounds before a single byte reaches the GPU.

use std::io::{BufReader, Cursor};

use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    culling::Aabb,
    data_structures::model::{Mesh, ModelVertex, Primitive},
    resources::load_binary,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimitiveData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub primitives: Vec<PrimitiveData>,
    /// Bounds of every vertex of every primitive.
    pub bounds: Aabb,
}

impl MeshData {
    /// Drops empty primitives and computes the bounds. Fails when nothing is left.
    pub fn new(name: &str, primitives: Vec<PrimitiveData>) -> anyhow::Result<Self> {
        let primitives: Vec<_> = primitives
            .into_iter()
            .filter(|p| !p.vertices.is_empty() && !p.indices.is_empty())
            .collect();
        let bounds = Aabb::from_positions(
            primitives
                .iter()
                .flat_map(|p| p.vertices.iter().map(|v| v.position)),
        )
        .ok_or_else(|| anyhow::anyhow!("Mesh {} has no vertices", name))?;
        Ok(Self {
            name: name.to_string(),
            primitives,
            bounds,
        })
    }

    pub fn index_count(&self) -> usize {
        self.primitives.iter().map(|p| p.indices.len()).sum()
    }

    pub fn upload(&self, device: &wgpu::Device) -> Mesh {
        let primitives = self
            .primitives
            .iter()
            .map(|p| Primitive {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Vertex Buffer", self.name)),
                    contents: bytemuck::cast_slice(&p.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Index Buffer", self.name)),
                    contents: bytemuck::cast_slice(&p.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                num_elements: p.indices.len() as u32,
            })
            .collect();
        Mesh {
            name: self.name.clone(),
            primitives,
            bounds: self.bounds,
        }
    }
}

/// Parses Wavefront OBJ text. Materials are ignored; node textures come
/// from the texture list instead.
pub async fn parse_obj(file_name: &str, obj_text: &str) -> anyhow::Result<MeshData> {
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));
    let (models, _) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| async { tobj::MTLLoadResult::Ok(Default::default()) },
    )
    .await?;

    let primitives = models
        .iter()
        .map(|m| {
            let mesh = &m.mesh;
            let vertices = (0..mesh.positions.len() / 3)
                .map(|i| ModelVertex {
                    position: [
                        mesh.positions[i * 3],
                        mesh.positions[i * 3 + 1],
                        mesh.positions[i * 3 + 2],
                    ],
                    tex_coords: [
                        mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                    normal: [
                        mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                })
                .collect();
            PrimitiveData {
                vertices,
                indices: mesh.indices.clone(),
            }
        })
        .collect();
    MeshData::new(file_name, primitives)
}

/// Parses a `.gltf` or `.glb` file. All primitives of all meshes are merged
/// into one mesh; node transforms inside the file are not applied.
pub async fn parse_gltf(file_name: &str, bytes: &[u8]) -> anyhow::Result<MeshData> {
    let gltf = gltf::Gltf::from_slice(bytes)?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("{} references a missing binary chunk", file_name))?;
                buffer_data.push(blob.into());
            }
            gltf::buffer::Source::Uri(uri) => buffer_data.push(load_binary(uri).await?),
        }
    }

    let mut primitives = Vec::new();
    for mesh in gltf.meshes() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping non-triangle primitive in mesh {:?} of {}",
                    mesh.name(),
                    file_name
                );
                continue;
            }
            let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));

            let mut vertices: Vec<ModelVertex> = match reader.read_positions() {
                Some(positions) => positions
                    .map(|position| ModelVertex {
                        position,
                        ..Default::default()
                    })
                    .collect(),
                None => continue,
            };
            if let Some(normals) = reader.read_normals() {
                vertices
                    .iter_mut()
                    .zip(normals)
                    .for_each(|(v, normal)| v.normal = normal);
            }
            if let Some(tex_coords) = reader.read_tex_coords(0).map(|t| t.into_f32()) {
                vertices
                    .iter_mut()
                    .zip(tex_coords)
                    .for_each(|(v, uv)| v.tex_coords = uv);
            }
            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };
            primitives.push(PrimitiveData { vertices, indices });
        }
    }
    MeshData::new(file_name, primitives)
}

/// An axis-aligned cube spanning `[-0.5, 0.5]` on every axis with
/// outward normals and counter-clockwise front faces.
pub fn unit_cube() -> MeshData {
    // (normal, u); the third axis is normal x u so u x v == normal.
    const FACES: [([f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0]),
    ];
    const QUAD: [(f32, f32, [f32; 2]); 4] = [
        (-0.5, -0.5, [0.0, 1.0]),
        (0.5, -0.5, [1.0, 1.0]),
        (0.5, 0.5, [1.0, 0.0]),
        (-0.5, 0.5, [0.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u) in FACES {
        let n = Vector3::from(normal);
        let u = Vector3::from(u);
        let v = n.cross(u).normalize();
        let base = vertices.len() as u32;
        for (su, sv, tex_coords) in QUAD {
            vertices.push(ModelVertex {
                position: (n * 0.5 + u * su + v * sv).into(),
                tex_coords,
                normal,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let bounds = Aabb::new([-0.5, -0.5, -0.5].into(), [0.5, 0.5, 0.5].into());
    MeshData {
        name: "unit_cube".to_string(),
        primitives: vec![PrimitiveData { vertices, indices }],
        bounds,
    }
}
