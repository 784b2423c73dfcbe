use super::VkDevice;
use ash::vk;
use std::ffi::CStr;
use std::io::Cursor;
use std::sync::Arc;

use crate::gpu::ShaderStage;

const ENTRY_POINT: &CStr = c"main";

pub struct VkShaderModule {
    device: Arc<VkDevice>,
    pub stage: ShaderStage,
    pub shader: vk::ShaderModule,
}

impl VkShaderModule {
    pub fn new(device: Arc<VkDevice>, stage: ShaderStage, code: &[u8]) -> Result<VkShaderModule, String> {
        let code = ash::util::read_spv(&mut Cursor::new(code))
            .map_err(|e| format!("Failed to decode SPIR-V: {}", e))?;

        let create_info = vk::ShaderModuleCreateInfo {
            code_size: code.len() * std::mem::size_of::<u32>(),
            p_code: code.as_ptr(),
            ..Default::default()
        };

        let shader = unsafe {
            device
                .inner
                .create_shader_module(&create_info, None)
                .map_err(|e| format!("Failed to create shader module: {}", e))?
        };

        return Ok(VkShaderModule {
            device,
            stage,
            shader,
        });
    }

    pub fn stage_flags(&self) -> vk::ShaderStageFlags {
        return match self.stage {
            ShaderStage::Vertex => vk::ShaderStageFlags::VERTEX,
            ShaderStage::Fragment => vk::ShaderStageFlags::FRAGMENT,
            ShaderStage::Geometry => vk::ShaderStageFlags::GEOMETRY,
        };
    }
}

impl Drop for VkShaderModule {
    fn drop(&mut self) {
        unsafe {
            self.device.inner.destroy_shader_module(self.shader, None);
        }
    }
}

/// A set of shader modules forming a complete program.
pub struct VkProgram {
    pub modules: Vec<VkShaderModule>,
}

impl VkProgram {
    /// Checks that the modules form a linkable program: exactly one vertex
    /// and one fragment stage, at most one geometry stage.
    pub fn link(modules: Vec<VkShaderModule>) -> Result<VkProgram, String> {
        let count = |stage: ShaderStage| modules.iter().filter(|m| m.stage == stage).count();

        if count(ShaderStage::Vertex) != 1 {
            return Err("a program needs exactly one vertex stage".to_string());
        }
        if count(ShaderStage::Fragment) != 1 {
            return Err("a program needs exactly one fragment stage".to_string());
        }
        if count(ShaderStage::Geometry) > 1 {
            return Err("a program takes at most one geometry stage".to_string());
        }

        return Ok(VkProgram { modules });
    }

    /// Stage descriptions for pipeline creation, every stage entering at
    /// `main`.
    pub fn stage_create_infos(&self) -> Vec<vk::PipelineShaderStageCreateInfo<'_>> {
        return self
            .modules
            .iter()
            .map(|module| vk::PipelineShaderStageCreateInfo {
                stage: module.stage_flags(),
                module: module.shader,
                p_name: ENTRY_POINT.as_ptr(),
                ..Default::default()
            })
            .collect();
    }
}
