use ash::vk::{self, ImageSubresourceRange};
use std::sync::Arc;

use crate::gpu::RgbaPixels;
use crate::vulkan::{VkBuffer, VkCommandPool, VkDevice, VkPhysicalDevice, VkQueue};

pub const TEXTURE_FORMAT: vk::Format = vk::Format::R8G8B8A8_SRGB;

const COLOR_RANGE: ImageSubresourceRange = ImageSubresourceRange {
    aspect_mask: vk::ImageAspectFlags::COLOR,
    base_mip_level: 0,
    level_count: 1,
    base_array_layer: 0,
    layer_count: 1,
};

/// A sampled 2D texture in device-local memory.
pub struct VkTexture {
    device: Arc<VkDevice>,
    pub image: vk::Image,
    pub memory: vk::DeviceMemory,
    pub view: vk::ImageView,
    pub sampler: vk::Sampler,
    pub extent: vk::Extent2D,
}

impl VkTexture {
    pub fn new(
        physical_device: &VkPhysicalDevice,
        device: Arc<VkDevice>,
        queue: &VkQueue,
        command: &VkCommandPool,
        pixels: &RgbaPixels,
    ) -> Result<VkTexture, String> {
        let staging = VkBuffer::staging(physical_device, device.clone(), &pixels.data)?;

        let extent = vk::Extent2D {
            width: pixels.width,
            height: pixels.height,
        };

        let (image, memory) = create_image(
            physical_device,
            &device,
            extent,
            TEXTURE_FORMAT,
            vk::ImageTiling::OPTIMAL,
            vk::ImageUsageFlags::TRANSFER_DST | vk::ImageUsageFlags::SAMPLED,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        )?;

        // Null view and sampler are skipped by the destroy calls in Drop.
        let mut texture = VkTexture {
            device,
            image,
            memory,
            view: vk::ImageView::null(),
            sampler: vk::Sampler::null(),
            extent,
        };

        let region = vk::BufferImageCopy {
            image_subresource: vk::ImageSubresourceLayers {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                mip_level: 0,
                base_array_layer: 0,
                layer_count: 1,
            },
            image_extent: vk::Extent3D {
                width: extent.width,
                height: extent.height,
                depth: 1,
            },
            ..Default::default()
        };

        command.submit_once(queue, |device, command_buffer| unsafe {
            transition_layout(
                device,
                command_buffer,
                image,
                vk::ImageLayout::UNDEFINED,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            );
            device.cmd_copy_buffer_to_image(
                command_buffer,
                staging.inner,
                image,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &[region],
            );
            transition_layout(
                device,
                command_buffer,
                image,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            );
        })?;

        texture.view = create_image_view(&texture.device, &image, TEXTURE_FORMAT)?;
        texture.sampler = create_sampler(&texture.device)?;

        return Ok(texture);
    }
}

impl Drop for VkTexture {
    fn drop(&mut self) {
        unsafe {
            self.device.inner.destroy_sampler(self.sampler, None);
            self.device.inner.destroy_image_view(self.view, None);
            self.device.inner.destroy_image(self.image, None);
            self.device.inner.free_memory(self.memory, None);
        }
    }
}

pub fn create_image(
    physical_device: &VkPhysicalDevice,
    device: &VkDevice,
    extent: vk::Extent2D,
    format: vk::Format,
    tiling: vk::ImageTiling,
    usage: vk::ImageUsageFlags,
    properties: vk::MemoryPropertyFlags,
) -> Result<(vk::Image, vk::DeviceMemory), String> {
    let create_info = vk::ImageCreateInfo {
        image_type: vk::ImageType::TYPE_2D,
        extent: vk::Extent3D {
            width: extent.width,
            height: extent.height,
            depth: 1,
        },
        mip_levels: 1,
        array_layers: 1,
        format,
        tiling,
        initial_layout: vk::ImageLayout::UNDEFINED,
        usage,
        samples: vk::SampleCountFlags::TYPE_1,
        sharing_mode: vk::SharingMode::EXCLUSIVE,
        ..Default::default()
    };

    let image = unsafe {
        device
            .inner
            .create_image(&create_info, None)
            .map_err(|e| format!("Failed to create image: {}", e))?
    };

    let memory = match allocate_image_memory(physical_device, device, image, properties) {
        Ok(memory) => memory,
        Err(e) => {
            unsafe { device.inner.destroy_image(image, None) };
            return Err(e);
        }
    };

    return Ok((image, memory));
}

fn allocate_image_memory(
    physical_device: &VkPhysicalDevice,
    device: &VkDevice,
    image: vk::Image,
    properties: vk::MemoryPropertyFlags,
) -> Result<vk::DeviceMemory, String> {
    let memory_requirements = unsafe { device.inner.get_image_memory_requirements(image) };
    let memory_type =
        physical_device.find_memory_type(memory_requirements.memory_type_bits, properties)?;

    let allocate_info = vk::MemoryAllocateInfo {
        allocation_size: memory_requirements.size,
        memory_type_index: memory_type,
        ..Default::default()
    };

    let memory = unsafe {
        device
            .inner
            .allocate_memory(&allocate_info, None)
            .map_err(|e| format!("Failed to allocate image memory: {}", e))?
    };

    if let Err(e) = unsafe { device.inner.bind_image_memory(image, memory, 0) } {
        unsafe { device.inner.free_memory(memory, None) };
        return Err(format!("Failed to bind memory to image: {}", e));
    }

    return Ok(memory);
}

pub fn create_image_view(
    device: &VkDevice,
    image: &vk::Image,
    format: vk::Format,
) -> Result<vk::ImageView, String> {
    let create_info = vk::ImageViewCreateInfo {
        image: *image,
        view_type: vk::ImageViewType::TYPE_2D,
        format,
        subresource_range: COLOR_RANGE,
        ..Default::default()
    };

    let image_view = unsafe {
        device
            .inner
            .create_image_view(&create_info, None)
            .map_err(|e| format!("Failed to create image view: {}", e))?
    };

    return Ok(image_view);
}

/// Texel-exact lookups clamped at the edges.
fn sampler_create_info() -> vk::SamplerCreateInfo<'static> {
    return vk::SamplerCreateInfo {
        mag_filter: vk::Filter::NEAREST,
        min_filter: vk::Filter::NEAREST,
        mipmap_mode: vk::SamplerMipmapMode::NEAREST,
        address_mode_u: vk::SamplerAddressMode::CLAMP_TO_EDGE,
        address_mode_v: vk::SamplerAddressMode::CLAMP_TO_EDGE,
        address_mode_w: vk::SamplerAddressMode::CLAMP_TO_EDGE,
        border_color: vk::BorderColor::INT_OPAQUE_BLACK,
        compare_op: vk::CompareOp::ALWAYS,
        ..Default::default()
    };
}

fn create_sampler(device: &VkDevice) -> Result<vk::Sampler, String> {
    let create_info = sampler_create_info();

    let sampler = unsafe {
        device
            .inner
            .create_sampler(&create_info, None)
            .map_err(|e| format!("Failed to create sampler: {}", e))?
    };

    return Ok(sampler);
}

/// Records the barrier for the two transitions a texture upload needs.
unsafe fn transition_layout(
    device: &ash::Device,
    command_buffer: vk::CommandBuffer,
    image: vk::Image,
    old_layout: vk::ImageLayout,
    new_layout: vk::ImageLayout,
) {
    let (src_access_mask, dst_access_mask, src_stage, dst_stage) =
        if new_layout == vk::ImageLayout::TRANSFER_DST_OPTIMAL {
            (
                vk::AccessFlags::empty(),
                vk::AccessFlags::TRANSFER_WRITE,
                vk::PipelineStageFlags::TOP_OF_PIPE,
                vk::PipelineStageFlags::TRANSFER,
            )
        } else {
            (
                vk::AccessFlags::TRANSFER_WRITE,
                vk::AccessFlags::SHADER_READ,
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::FRAGMENT_SHADER,
            )
        };

    let barrier = vk::ImageMemoryBarrier {
        src_access_mask,
        dst_access_mask,
        old_layout,
        new_layout,
        src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        image,
        subresource_range: COLOR_RANGE,
        ..Default::default()
    };

    device.cmd_pipeline_barrier(
        command_buffer,
        src_stage,
        dst_stage,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[barrier],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textures_sample_nearest_texels_clamped_to_the_edge() {
        let info = sampler_create_info();

        assert_eq!(info.mag_filter, vk::Filter::NEAREST);
        assert_eq!(info.min_filter, vk::Filter::NEAREST);
        assert_eq!(info.address_mode_u, vk::SamplerAddressMode::CLAMP_TO_EDGE);
        assert_eq!(info.address_mode_v, vk::SamplerAddressMode::CLAMP_TO_EDGE);
    }
}
