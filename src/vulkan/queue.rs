use ash::vk;
use std::sync::Arc;

use super::VkDevice;

pub struct VkQueue {
    device: Arc<VkDevice>,
    pub inner: vk::Queue,
}

impl VkQueue {
    pub fn new(device: Arc<VkDevice>, queue_family_index: u32) -> VkQueue {
        let inner = unsafe { device.inner.get_device_queue(queue_family_index, 0) };

        return VkQueue { device, inner };
    }

    /// Submits one command buffer and blocks until the queue drains.
    pub fn submit_and_wait(&self, command_buffer: &vk::CommandBuffer) -> Result<(), String> {
        let submit_info = vk::SubmitInfo {
            command_buffer_count: 1,
            p_command_buffers: command_buffer,
            ..Default::default()
        };

        unsafe {
            self.device
                .inner
                .queue_submit(self.inner, &[submit_info], vk::Fence::null())
                .map_err(|e| format!("Failed to submit command buffer: {}", e))?;

            self.device
                .inner
                .queue_wait_idle(self.inner)
                .map_err(|e| format!("Failed to wait for queue: {}", e))?;
        }

        return Ok(());
    }
}

impl Drop for VkQueue {
    fn drop(&mut self) {
        if let Err(e) = unsafe { self.device.inner.queue_wait_idle(self.inner) } {
            log::warn!(target: "gpu", "Failed to wait for queue: {}", e);
        }
    }
}
