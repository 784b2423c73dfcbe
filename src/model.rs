use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use lineal::Matrix;

use crate::assets::AssetSource;
use crate::camera::Camera;
use crate::error::Result;
use crate::gpu::{
    BufferHandle, GpuDevice, LayoutHandle, VertexBinding, NORMAL_SLOT, POSITION_SLOT,
    TEXCOORD_SLOT,
};
use crate::materials::MaterialResource;
use crate::objects::{Geometry, MeshBuffers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
}

/// One draw call worth of vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRange {
    pub name: String,
    pub topology: Topology,
    pub start: u32,
    pub count: u32,
    /// Index into [`Model::materials`].
    pub material: Option<usize>,
}

/// Receives the bind and draw commands of [`Model::draw`].
pub trait DrawTarget {
    /// Model, view and projection matrices for every draw that follows.
    fn bind_transforms(
        &mut self,
        model: &Matrix<f32, 4, 4>,
        view: &Matrix<f32, 4, 4>,
        projection: &Matrix<f32, 4, 4>,
    );

    fn bind_layout(&mut self, layout: &LayoutHandle);

    fn bind_material(&mut self, material: &MaterialResource);

    fn draw(&mut self, topology: Topology, start: u32, count: u32);
}

/// A loaded model: its vertex streams on the GPU and the ranges to draw
/// them with.
pub struct Model {
    /// Model-to-world matrix, identity after a load.
    pub transform: Matrix<f32, 4, 4>,

    layout: LayoutHandle,
    buffers: [Option<BufferHandle>; 3],
    ranges: Vec<DrawRange>,
    materials: Vec<MaterialResource>,
    vertex_count: usize,
}

/// Resources created so far by a load. Released as a whole if the load
/// fails part way.
#[derive(Default)]
struct Staged {
    buffers: [Option<BufferHandle>; 3],
    materials: Vec<MaterialResource>,
}

impl Staged {
    fn release(self, gpu: &mut dyn GpuDevice) {
        for buffer in self.buffers.into_iter().flatten() {
            gpu.release_buffer(buffer);
        }
        for material in self.materials {
            material.release(gpu);
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("Model")
            .field("layout", &self.layout)
            .field("buffers", &self.buffers)
            .field("ranges", &self.ranges)
            .field("materials", &self.materials)
            .field("vertex_count", &self.vertex_count)
            .finish_non_exhaustive();
    }
}

impl Model {
    pub fn load(gpu: &mut dyn GpuDevice, assets: &dyn AssetSource, path: &Path) -> Result<Model> {
        log::info!(target: "asset", "Loading model '{}'", path.display());

        let geometry = Geometry::load(assets, path)?;
        let buffers = MeshBuffers::build(&geometry)?;

        let mut staged = Staged::default();
        return match Model::upload(gpu, assets, &geometry, &buffers, &mut staged) {
            Ok((layout, ranges)) => {
                log::info!(
                    target: "asset",
                    "Loaded model '{}': {} vertices, {} range(s), {} material(s)",
                    path.display(),
                    buffers.vertex_count(),
                    ranges.len(),
                    staged.materials.len()
                );

                Ok(Model {
                    transform: Matrix::identity(),
                    layout,
                    buffers: staged.buffers,
                    ranges,
                    materials: staged.materials,
                    vertex_count: buffers.vertex_count(),
                })
            }
            Err(e) => {
                staged.release(gpu);
                Err(e)
            }
        };
    }

    fn upload(
        gpu: &mut dyn GpuDevice,
        assets: &dyn AssetSource,
        geometry: &Geometry,
        buffers: &MeshBuffers,
        staged: &mut Staged,
    ) -> Result<(LayoutHandle, Vec<DrawRange>)> {
        let streams: [(&[f32], u32, u32); 3] = [
            (buffers.positions.as_slice(), POSITION_SLOT, 3),
            (buffers.normals.as_slice(), NORMAL_SLOT, 3),
            (buffers.texcoords.as_slice(), TEXCOORD_SLOT, 2),
        ];

        for (values, slot, components) in streams {
            if values.is_empty() {
                continue;
            }
            staged.buffers[slot as usize] = Some(gpu.upload_float_buffer(values, slot, components)?);
        }

        let mut ranges = Vec::with_capacity(buffers.ranges.len());
        let mut by_name: HashMap<&str, usize> = HashMap::new();

        for range in &buffers.ranges {
            let material = match geometry.materials.get(&range.material) {
                Some(_) if by_name.contains_key(range.material.as_str()) => {
                    Some(by_name[range.material.as_str()])
                }
                Some(definition) => {
                    let resource = MaterialResource::create(gpu, assets, definition)?;
                    staged.materials.push(resource);

                    let index = staged.materials.len() - 1;
                    by_name.insert(&range.material, index);
                    Some(index)
                }
                None => {
                    if !range.material.is_empty() {
                        log::warn!(
                            target: "asset",
                            "Group '{}' uses unknown material '{}'",
                            range.name,
                            range.material
                        );
                    }
                    None
                }
            };

            ranges.push(DrawRange {
                name: range.name.clone(),
                topology: Topology::TriangleList,
                start: range.start,
                count: range.count,
                material,
            });
        }

        let components = [3, 3, 2];
        let bindings: Vec<VertexBinding<'_>> = staged
            .buffers
            .iter()
            .zip(components)
            .enumerate()
            .filter_map(|(slot, (buffer, components))| {
                buffer.as_ref().map(|buffer| VertexBinding {
                    slot: slot as u32,
                    buffer,
                    components,
                })
            })
            .collect();

        let layout = gpu.create_vertex_layout(&bindings)?;
        return Ok((layout, ranges));
    }

    pub fn ranges(&self) -> &[DrawRange] {
        return &self.ranges;
    }

    pub fn materials(&self) -> &[MaterialResource] {
        return &self.materials;
    }

    /// The material bound for `range`, if any.
    pub fn material(&self, range: &DrawRange) -> Option<&MaterialResource> {
        return range.material.and_then(|index| self.materials.get(index));
    }

    pub fn layout(&self) -> &LayoutHandle {
        return &self.layout;
    }

    /// The buffer bound at an attribute slot, `None` for empty streams.
    pub fn buffer(&self, slot: u32) -> Option<&BufferHandle> {
        return self.buffers.get(slot as usize).and_then(Option::as_ref);
    }

    pub fn vertex_count(&self) -> usize {
        return self.vertex_count;
    }

    /// Binds the transforms seen from `camera` and the layout, then each
    /// range's material (when it has one) and issues one draw per range, in
    /// declaration order.
    pub fn draw(&self, camera: &Camera, target: &mut dyn DrawTarget) {
        target.bind_transforms(
            &self.transform,
            &camera.view_matrix(),
            &camera.projection_matrix(),
        );
        target.bind_layout(&self.layout);

        for range in &self.ranges {
            if let Some(material) = self.material(range) {
                target.bind_material(material);
            }
            target.draw(range.topology, range.start, range.count);
        }
    }

    /// Frees the layout, the vertex buffers and every owned material.
    pub fn release(self, gpu: &mut dyn GpuDevice) {
        gpu.release_layout(self.layout);

        Staged {
            buffers: self.buffers,
            materials: self.materials,
        }
        .release(gpu);
    }
}
