use std::collections::BTreeSet;
use std::ffi::c_char;
use std::slice;

use crate::vulkan::DEVICE_EXTENSIONS;
use crate::vulkan::{QueueFamiliesIndices, VkInstance, VkPhysicalDevice};

use ash::{vk, Device};

const QUEUE_PRIORITY: f32 = 1.0;

/// Logical device. Shared behind an `Arc` by everything that creates
/// resources from it and destroyed last.
pub struct VkDevice {
    pub inner: Device,
}

impl VkDevice {
    pub fn new(
        instance: &VkInstance,
        physical_device: &VkPhysicalDevice,
    ) -> Result<VkDevice, String> {
        let families = unique_families(&physical_device.queue_families);

        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = families
            .iter()
            .map(|&family| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(family)
                    .queue_priorities(slice::from_ref(&QUEUE_PRIORITY))
            })
            .collect();

        let extensions: Vec<*const c_char> = DEVICE_EXTENSIONS
            .iter()
            .map(|extension| extension.as_ptr())
            .collect();

        // Textures are sampled without anisotropy, nothing optional is needed.
        let features = vk::PhysicalDeviceFeatures::default();

        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extensions)
            .enabled_features(&features);

        let inner = unsafe {
            instance
                .inner
                .create_device(physical_device.inner, &create_info, None)
                .map_err(|e| format!("Failed to create logical device: {}", e))?
        };

        log::debug!(
            target: "gpu",
            "Logical device on '{}' with queue families {:?}",
            physical_device.name,
            families
        );

        return Ok(VkDevice { inner });
    }

    pub fn wait_idle(&self) {
        if let Err(e) = unsafe { self.inner.device_wait_idle() } {
            log::warn!(target: "gpu", "Failed to wait for device idle: {}", e);
        }
    }
}

impl Drop for VkDevice {
    fn drop(&mut self) {
        unsafe {
            self.inner.destroy_device(None);
        }
    }
}

/// One entry per distinct family; graphics and present often share one.
fn unique_families(indices: &QueueFamiliesIndices) -> Vec<u32> {
    let families: BTreeSet<u32> = [indices.graphics_family, indices.present_family]
        .into_iter()
        .collect();

    return families.into_iter().collect();
}
