use std::path::{Path, PathBuf};

use crate::assets::{read_asset, AssetSource};
use crate::error::{Error, Result};
use crate::gpu::{GpuDevice, TextureHandle};

/// Tightly packed 8-bit RGBA pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaPixels {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaPixels {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(Error::UnsupportedStride);
        }

        return Ok(RgbaPixels {
            width,
            height,
            data,
        });
    }
}

/// Decodes an encoded image (PNG, JPEG, ...) and converts it to RGBA8.
pub fn decode(bytes: &[u8]) -> Result<RgbaPixels> {
    let image = image::load_from_memory(bytes)?;
    let rgba = image.to_rgba8();

    let (width, height) = rgba.dimensions();
    return RgbaPixels::new(width, height, rgba.into_raw());
}

/// An uploaded image map.
#[derive(Debug)]
pub struct Texture {
    handle: TextureHandle,
    path: PathBuf,
}

impl Texture {
    pub fn load(gpu: &mut dyn GpuDevice, assets: &dyn AssetSource, path: &Path) -> Result<Self> {
        log::info!(target: "asset", "Loading texture '{}'", path.display());

        let bytes = read_asset(assets, path)?;
        let pixels = decode(&bytes)?;
        let handle = gpu.upload_texture(&pixels)?;

        log::debug!(
            target: "gpu",
            "Uploaded texture '{}' ({}x{})",
            path.display(),
            pixels.width,
            pixels.height
        );

        return Ok(Texture {
            handle,
            path: path.to_path_buf(),
        });
    }

    pub fn handle(&self) -> &TextureHandle {
        return &self.handle;
    }

    pub fn path(&self) -> &Path {
        return &self.path;
    }

    pub fn release(self, gpu: &mut dyn GpuDevice) {
        gpu.release_texture(self.handle);
    }
}
