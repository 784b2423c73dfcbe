use std::collections::HashMap;
use std::sync::Arc;

use ash::vk;
use winit::window::Window;

use crate::error::{Error, Result};
use crate::gpu::{
    BufferHandle, GpuDevice, LayoutHandle, ProgramHandle, RgbaPixels, ShaderSource, TextureHandle,
    VertexBinding,
};
use crate::vulkan::{
    VkBuffer, VkCommandPool, VkDevice, VkInstance, VkPhysicalDevice, VkProgram, VkQueue,
    VkShaderModule, VkSurface, VkTexture, VkVertexLayout,
};

/// Vulkan implementation of [`GpuDevice`].
///
/// Resources live in per-kind tables keyed by the id carried in their
/// handle. Fields drop in declaration order, so every resource is gone
/// before the device, and the device before the instance.
pub struct VkBackend {
    buffers: HashMap<u64, VkBuffer>,
    textures: HashMap<u64, VkTexture>,
    layouts: HashMap<u64, VkVertexLayout>,
    programs: HashMap<u64, VkProgram>,
    next_id: u64,

    command: VkCommandPool,
    graphics_queue: VkQueue,
    device: Arc<VkDevice>,
    physical_device: VkPhysicalDevice,
    surface: VkSurface,
    instance: VkInstance,
}

impl VkBackend {
    pub fn new(window: &Window) -> Result<VkBackend> {
        let instance = VkInstance::new(window).map_err(Error::Gpu)?;
        let surface = VkSurface::new(window, &instance).map_err(Error::Gpu)?;
        let physical_device = VkPhysicalDevice::new(&instance, &surface).map_err(Error::Gpu)?;
        let device = Arc::new(VkDevice::new(&instance, &physical_device).map_err(Error::Gpu)?);

        let graphics_family = physical_device.queue_families.graphics_family;
        let graphics_queue = VkQueue::new(device.clone(), graphics_family);
        let command = VkCommandPool::new(device.clone(), graphics_family).map_err(Error::Gpu)?;

        log::debug!(target: "gpu", "Vulkan backend ready on '{}'", physical_device.name);

        return Ok(VkBackend {
            buffers: HashMap::new(),
            textures: HashMap::new(),
            layouts: HashMap::new(),
            programs: HashMap::new(),
            next_id: 1,
            command,
            graphics_queue,
            device,
            physical_device,
            surface,
            instance,
        });
    }

    pub fn device(&self) -> &VkDevice {
        return &self.device;
    }

    pub fn surface(&self) -> &VkSurface {
        return &self.surface;
    }

    pub fn instance(&self) -> &VkInstance {
        return &self.instance;
    }

    pub fn buffer(&self, handle: &BufferHandle) -> Option<&VkBuffer> {
        return self.buffers.get(&handle.id());
    }

    pub fn texture(&self, handle: &TextureHandle) -> Option<&VkTexture> {
        return self.textures.get(&handle.id());
    }

    pub fn layout(&self, handle: &LayoutHandle) -> Option<&VkVertexLayout> {
        return self.layouts.get(&handle.id());
    }

    pub fn program(&self, handle: &ProgramHandle) -> Option<&VkProgram> {
        return self.programs.get(&handle.id());
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        return id;
    }
}

impl GpuDevice for VkBackend {
    fn upload_float_buffer(
        &mut self,
        values: &[f32],
        slot: u32,
        components: u32,
    ) -> Result<BufferHandle> {
        let bytes: Vec<u8> = values.iter().flat_map(|value| value.to_ne_bytes()).collect();

        let buffer = VkBuffer::new(
            &self.physical_device,
            self.device.clone(),
            &self.graphics_queue,
            &self.command,
            &bytes,
            vk::BufferUsageFlags::VERTEX_BUFFER,
        )
        .map_err(Error::Gpu)?;

        let id = self.next_id();
        log::trace!(
            target: "gpu",
            "Buffer #{}: {} floats for slot {} ({} per vertex)",
            id,
            values.len(),
            slot,
            components
        );

        self.buffers.insert(id, buffer);
        return Ok(BufferHandle::new(id));
    }

    fn upload_texture(&mut self, pixels: &RgbaPixels) -> Result<TextureHandle> {
        let texture = VkTexture::new(
            &self.physical_device,
            self.device.clone(),
            &self.graphics_queue,
            &self.command,
            pixels,
        )
        .map_err(Error::Gpu)?;

        let id = self.next_id();
        self.textures.insert(id, texture);
        return Ok(TextureHandle::new(id));
    }

    fn create_vertex_layout(&mut self, bindings: &[VertexBinding<'_>]) -> Result<LayoutHandle> {
        let mut layout = VkVertexLayout::new();

        for binding in bindings {
            let buffer = self
                .buffers
                .get(&binding.buffer.id())
                .ok_or_else(|| Error::Gpu(format!("Unknown buffer #{}", binding.buffer.id())))?;

            layout
                .push(binding.slot, buffer.inner, binding.components)
                .map_err(Error::Gpu)?;
        }

        let id = self.next_id();
        self.layouts.insert(id, layout);
        return Ok(LayoutHandle::new(id));
    }

    fn compile_program(&mut self, sources: &[ShaderSource<'_>]) -> Result<ProgramHandle> {
        let mut modules = Vec::with_capacity(sources.len());

        for source in sources {
            let module = VkShaderModule::new(self.device.clone(), source.stage, source.code)
                .map_err(|log| Error::Compile {
                    name: source.name.to_string(),
                    log,
                })?;
            modules.push(module);
        }

        let program = VkProgram::link(modules).map_err(Error::Link)?;

        let id = self.next_id();
        self.programs.insert(id, program);
        return Ok(ProgramHandle::new(id));
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        match self.buffers.remove(&buffer.id()) {
            Some(buffer) => {
                if self.layouts.values().any(|layout| layout.buffers.contains(&buffer.inner)) {
                    log::warn!(target: "gpu", "Released a buffer still bound by a vertex layout");
                }
            }
            None => log::warn!(target: "gpu", "Release of unknown buffer #{}", buffer.id()),
        }
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture.id()).is_none() {
            log::warn!(target: "gpu", "Release of unknown texture #{}", texture.id());
        }
    }

    fn release_layout(&mut self, layout: LayoutHandle) {
        if self.layouts.remove(&layout.id()).is_none() {
            log::warn!(target: "gpu", "Release of unknown layout #{}", layout.id());
        }
    }

    fn release_program(&mut self, program: ProgramHandle) {
        if self.programs.remove(&program.id()).is_none() {
            log::warn!(target: "gpu", "Release of unknown program #{}", program.id());
        }
    }
}

impl Drop for VkBackend {
    fn drop(&mut self) {
        self.device.wait_idle();

        let leaked =
            self.buffers.len() + self.textures.len() + self.layouts.len() + self.programs.len();
        if leaked > 0 {
            log::warn!(target: "gpu", "{} GPU resource(s) were never released", leaked);
        }
    }
}
