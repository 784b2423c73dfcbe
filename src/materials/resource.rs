use crate::assets::AssetSource;
use crate::error::Result;
use crate::gpu::{GpuDevice, Texture, TextureHandle};
use crate::materials::{Color, MapFlags, MapKind, MaterialDef};

/// Shading parameters laid out for a uniform block (std140: every vec3 is
/// padded to a vec4).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialUniforms {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
    pub dissolve: f32,
    pub map_flags: u32,
    pub _padding: u32,
}

/// A material whose image maps live on the GPU.
#[derive(Debug)]
pub struct MaterialResource {
    ambient: Color,
    diffuse: Color,
    specular: Color,
    shininess: f32,
    dissolve: f32,
    maps: [Option<Texture>; 4],
    flags: MapFlags,
}

impl MaterialResource {
    /// Uploads every map `material` names. If any upload fails the maps
    /// already uploaded are released before the error is returned.
    pub fn create(
        gpu: &mut dyn GpuDevice,
        assets: &dyn AssetSource,
        material: &MaterialDef,
    ) -> Result<Self> {
        let mut maps: [Option<Texture>; 4] = [None, None, None, None];
        let mut flags = MapFlags::empty();

        for kind in MapKind::ALL {
            let path = match material.map(kind) {
                Some(path) => path,
                None => continue,
            };

            match Texture::load(gpu, assets, path) {
                Ok(texture) => {
                    maps[kind.slot() as usize] = Some(texture);
                    flags.insert(kind.flag());
                }
                Err(e) => {
                    for texture in maps.into_iter().flatten() {
                        texture.release(gpu);
                    }
                    return Err(e);
                }
            }
        }

        return Ok(MaterialResource {
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: material.specular,
            shininess: material.shininess,
            dissolve: material.dissolve,
            maps,
            flags,
        });
    }

    pub fn flags(&self) -> MapFlags {
        return self.flags;
    }

    pub fn map(&self, kind: MapKind) -> Option<&TextureHandle> {
        return self.maps[kind.slot() as usize].as_ref().map(Texture::handle);
    }

    pub fn ambient(&self) -> Color {
        return self.ambient;
    }

    pub fn diffuse(&self) -> Color {
        return self.diffuse;
    }

    pub fn specular(&self) -> Color {
        return self.specular;
    }

    pub fn shininess(&self) -> f32 {
        return self.shininess;
    }

    pub fn dissolve(&self) -> f32 {
        return self.dissolve;
    }

    pub fn uniforms(&self) -> MaterialUniforms {
        let [ar, ag, ab] = self.ambient;
        let [dr, dg, db] = self.diffuse;
        let [sr, sg, sb] = self.specular;

        return MaterialUniforms {
            ambient: [ar, ag, ab, 0.],
            diffuse: [dr, dg, db, 0.],
            specular: [sr, sg, sb, 0.],
            shininess: self.shininess,
            dissolve: self.dissolve,
            map_flags: self.flags.bits(),
            _padding: 0,
        };
    }

    pub fn release(self, gpu: &mut dyn GpuDevice) {
        for texture in self.maps.into_iter().flatten() {
            texture.release(gpu);
        }
    }
}
