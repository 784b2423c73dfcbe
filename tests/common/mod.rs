#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use lumen::gpu::{
    BufferHandle, GpuDevice, LayoutHandle, ProgramHandle, RgbaPixels, ShaderSource, TextureHandle,
    VertexBinding,
};
use lumen::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UploadBuffer { id: u64, len: usize, slot: u32, components: u32 },
    UploadTexture { id: u64, width: u32, height: u32 },
    CreateLayout { id: u64, slots: Vec<(u32, u64, u32)> },
    CompileProgram { id: u64, stages: usize },
    ReleaseBuffer(u64),
    ReleaseTexture(u64),
    ReleaseLayout(u64),
    ReleaseProgram(u64),
}

/// A `GpuDevice` that hands out ids, remembers every call and tracks which
/// resources are still alive.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub calls: Vec<Call>,
    pub live: BTreeSet<u64>,
    pub buffers: HashMap<u64, Vec<f32>>,
    next_id: u64,
    /// Texture uploads succeed this many times, then fail.
    pub texture_budget: Option<usize>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        return RecordingDevice::default();
    }

    fn mint(&mut self) -> u64 {
        self.next_id += 1;
        self.live.insert(self.next_id);
        return self.next_id;
    }

    fn free(&mut self, id: u64) {
        assert!(self.live.remove(&id), "resource #{} released twice or never created", id);
    }

    pub fn texture_uploads(&self) -> usize {
        return self
            .calls
            .iter()
            .filter(|call| matches!(call, Call::UploadTexture { .. }))
            .count();
    }
}

impl GpuDevice for RecordingDevice {
    fn upload_float_buffer(
        &mut self,
        values: &[f32],
        slot: u32,
        components: u32,
    ) -> Result<BufferHandle> {
        let id = self.mint();
        self.buffers.insert(id, values.to_vec());
        self.calls.push(Call::UploadBuffer {
            id,
            len: values.len(),
            slot,
            components,
        });
        return Ok(BufferHandle::new(id));
    }

    fn upload_texture(&mut self, pixels: &RgbaPixels) -> Result<TextureHandle> {
        if let Some(budget) = self.texture_budget.as_mut() {
            if *budget == 0 {
                return Err(Error::Gpu("out of texture memory".to_string()));
            }
            *budget -= 1;
        }

        let id = self.mint();
        self.calls.push(Call::UploadTexture {
            id,
            width: pixels.width,
            height: pixels.height,
        });
        return Ok(TextureHandle::new(id));
    }

    fn create_vertex_layout(&mut self, bindings: &[VertexBinding<'_>]) -> Result<LayoutHandle> {
        let id = self.mint();
        let slots = bindings
            .iter()
            .map(|binding| (binding.slot, binding.buffer.id(), binding.components))
            .collect();
        self.calls.push(Call::CreateLayout { id, slots });
        return Ok(LayoutHandle::new(id));
    }

    fn compile_program(&mut self, sources: &[ShaderSource<'_>]) -> Result<ProgramHandle> {
        let id = self.mint();
        self.calls.push(Call::CompileProgram {
            id,
            stages: sources.len(),
        });
        return Ok(ProgramHandle::new(id));
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.free(buffer.id());
        self.calls.push(Call::ReleaseBuffer(buffer.id()));
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.free(texture.id());
        self.calls.push(Call::ReleaseTexture(texture.id()));
    }

    fn release_layout(&mut self, layout: LayoutHandle) {
        self.free(layout.id());
        self.calls.push(Call::ReleaseLayout(layout.id()));
    }

    fn release_program(&mut self, program: ProgramHandle) {
        self.free(program.id());
        self.calls.push(Call::ReleaseProgram(program.id()));
    }
}

/// In-memory asset files.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        return MemoryAssets::default();
    }

    pub fn with(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(PathBuf::from(path), bytes.into());
        return self;
    }

    pub fn get(&self, path: &Path) -> io::Result<Vec<u8>> {
        return self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()));
    }
}

impl lumen::AssetSource for MemoryAssets {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        return self.get(path);
    }
}

/// A small solid-color PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));

    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    return bytes.into_inner();
}
