use crate::vulkan::{VkCommandPool, VkDevice, VkPhysicalDevice, VkQueue};

use ash::vk;
use std::sync::Arc;

pub struct VkBuffer {
    device: Arc<VkDevice>,
    pub inner: vk::Buffer,
    pub memory: vk::DeviceMemory,
    pub size: vk::DeviceSize,
}

impl VkBuffer {
    /// Uploads `bytes` into a device-local buffer through a host-visible
    /// staging buffer.
    pub fn new(
        physical_device: &VkPhysicalDevice,
        device: Arc<VkDevice>,
        queue: &VkQueue,
        command: &VkCommandPool,
        bytes: &[u8],
        usage: vk::BufferUsageFlags,
    ) -> Result<VkBuffer, String> {
        let staging = VkBuffer::staging(physical_device, device.clone(), bytes)?;

        let buffer = VkBuffer::allocate(
            physical_device,
            device,
            staging.size,
            usage | vk::BufferUsageFlags::TRANSFER_DST,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        )?;

        let copy_region = vk::BufferCopy {
            src_offset: 0,
            dst_offset: 0,
            size: staging.size,
        };

        command.submit_once(queue, |device, command_buffer| unsafe {
            device.cmd_copy_buffer(command_buffer, staging.inner, buffer.inner, &[copy_region]);
        })?;

        return Ok(buffer);
    }

    /// A host-visible buffer holding a copy of `bytes`, used as a transfer
    /// source.
    pub fn staging(
        physical_device: &VkPhysicalDevice,
        device: Arc<VkDevice>,
        bytes: &[u8],
    ) -> Result<VkBuffer, String> {
        let staging = VkBuffer::allocate(
            physical_device,
            device,
            bytes.len() as vk::DeviceSize,
            vk::BufferUsageFlags::TRANSFER_SRC,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )?;

        unsafe {
            let data_ptr = staging
                .device
                .inner
                .map_memory(staging.memory, 0, staging.size, vk::MemoryMapFlags::empty())
                .map_err(|e| format!("Failed to map staging memory: {}", e))?;

            std::ptr::copy_nonoverlapping(bytes.as_ptr(), data_ptr as *mut u8, bytes.len());
            staging.device.inner.unmap_memory(staging.memory);
        }

        return Ok(staging);
    }

    pub fn allocate(
        physical_device: &VkPhysicalDevice,
        device: Arc<VkDevice>,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
        properties: vk::MemoryPropertyFlags,
    ) -> Result<VkBuffer, String> {
        if size == 0 {
            return Err("Cannot create an empty buffer".to_string());
        }

        let create_info = vk::BufferCreateInfo {
            size,
            usage,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            ..Default::default()
        };

        let inner = unsafe {
            device
                .inner
                .create_buffer(&create_info, None)
                .map_err(|e| format!("Failed to create buffer: {}", e))?
        };

        // From here on Drop cleans up whatever was created.
        let mut buffer = VkBuffer {
            device,
            inner,
            memory: vk::DeviceMemory::null(),
            size,
        };

        let memory_requirements =
            unsafe { buffer.device.inner.get_buffer_memory_requirements(buffer.inner) };

        let allocate_info = vk::MemoryAllocateInfo {
            allocation_size: memory_requirements.size,
            memory_type_index: physical_device
                .find_memory_type(memory_requirements.memory_type_bits, properties)?,
            ..Default::default()
        };

        buffer.memory = unsafe {
            buffer
                .device
                .inner
                .allocate_memory(&allocate_info, None)
                .map_err(|e| format!("Failed to allocate buffer memory: {}", e))?
        };

        unsafe {
            buffer
                .device
                .inner
                .bind_buffer_memory(buffer.inner, buffer.memory, 0)
                .map_err(|e| format!("Failed to bind buffer memory: {}", e))?;
        }

        return Ok(buffer);
    }
}

impl Drop for VkBuffer {
    fn drop(&mut self) {
        unsafe {
            self.device.inner.destroy_buffer(self.inner, None);
            self.device.inner.free_memory(self.memory, None);
        }
    }
}
