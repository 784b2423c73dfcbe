use std::path::Path;

use crate::assets::{read_asset, AssetSource};
use crate::error::{Error, Result};
use crate::gpu::{GpuDevice, ProgramHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    /// Picks the stage from a `name.vert.spv` style file name.
    pub fn from_path(path: &Path) -> Option<ShaderStage> {
        let name = path.file_name()?.to_str()?;

        if name.ends_with(".vert.spv") {
            return Some(ShaderStage::Vertex);
        } else if name.ends_with(".frag.spv") {
            return Some(ShaderStage::Fragment);
        } else if name.ends_with(".geom.spv") {
            return Some(ShaderStage::Geometry);
        }

        return None;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShaderSource<'a> {
    pub name: &'a str,
    pub stage: ShaderStage,
    pub code: &'a [u8],
}

/// A linked shader program.
#[derive(Debug)]
pub struct Program {
    handle: ProgramHandle,
}

impl Program {
    pub fn load(
        gpu: &mut dyn GpuDevice,
        assets: &dyn AssetSource,
        paths: &[&Path],
    ) -> Result<Program> {
        let mut stages = Vec::with_capacity(paths.len());

        for path in paths {
            log::info!(target: "asset", "Loading shader '{}'", path.display());

            let stage = ShaderStage::from_path(path).ok_or_else(|| Error::Compile {
                name: path.display().to_string(),
                log: "unknown shader stage, expected a .vert.spv, .frag.spv or .geom.spv file"
                    .to_string(),
            })?;
            stages.push((path.display().to_string(), stage, read_asset(assets, path)?));
        }

        let sources: Vec<ShaderSource<'_>> = stages
            .iter()
            .map(|(name, stage, code)| ShaderSource {
                name,
                stage: *stage,
                code,
            })
            .collect();

        let handle = gpu.compile_program(&sources)?;
        return Ok(Program { handle });
    }

    pub fn handle(&self) -> &ProgramHandle {
        return &self.handle;
    }

    pub fn release(self, gpu: &mut dyn GpuDevice) {
        gpu.release_program(self.handle);
    }
}
