use crate::vulkan::{VkDevice, VkQueue};

use ash::vk;
use std::sync::Arc;

/// Command pool for short-lived transfer work.
pub struct VkCommandPool {
    device: Arc<VkDevice>,
    pub pool: vk::CommandPool,
}

impl VkCommandPool {
    pub fn new(device: Arc<VkDevice>, queue_family_index: u32) -> Result<VkCommandPool, String> {
        let create_info = vk::CommandPoolCreateInfo {
            flags: vk::CommandPoolCreateFlags::TRANSIENT,
            queue_family_index,
            ..Default::default()
        };

        let pool = unsafe {
            device
                .inner
                .create_command_pool(&create_info, None)
                .map_err(|e| format!("Failed to create command pool: {}", e))?
        };

        return Ok(VkCommandPool { device, pool });
    }

    /// Records commands into a fresh primary buffer, submits it on `queue`
    /// and waits for completion.
    pub fn submit_once<F>(&self, queue: &VkQueue, record: F) -> Result<(), String>
    where
        F: FnOnce(&ash::Device, vk::CommandBuffer),
    {
        let allocate_info = vk::CommandBufferAllocateInfo {
            level: vk::CommandBufferLevel::PRIMARY,
            command_pool: self.pool,
            command_buffer_count: 1,
            ..Default::default()
        };

        let command_buffer = unsafe {
            self.device
                .inner
                .allocate_command_buffers(&allocate_info)
                .map_err(|e| format!("Failed to allocate command buffer: {}", e))?
                .remove(0)
        };

        let result = self.record_and_submit(queue, command_buffer, record);

        unsafe {
            self.device
                .inner
                .free_command_buffers(self.pool, &[command_buffer]);
        }

        return result;
    }

    fn record_and_submit<F>(
        &self,
        queue: &VkQueue,
        command_buffer: vk::CommandBuffer,
        record: F,
    ) -> Result<(), String>
    where
        F: FnOnce(&ash::Device, vk::CommandBuffer),
    {
        let begin_info = vk::CommandBufferBeginInfo {
            flags: vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT,
            ..Default::default()
        };

        unsafe {
            self.device
                .inner
                .begin_command_buffer(command_buffer, &begin_info)
                .map_err(|e| format!("Failed to begin command buffer: {}", e))?;
        }

        record(&self.device.inner, command_buffer);

        unsafe {
            self.device
                .inner
                .end_command_buffer(command_buffer)
                .map_err(|e| format!("Failed to end command buffer: {}", e))?;
        }

        return queue.submit_and_wait(&command_buffer);
    }
}

impl Drop for VkCommandPool {
    fn drop(&mut self) {
        unsafe {
            self.device.inner.destroy_command_pool(self.pool, None);
        }
    }
}
