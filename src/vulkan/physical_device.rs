use std::collections::{BTreeMap, HashSet};
use std::ffi::CStr;

use ash::{khr, vk, Instance};

use crate::vulkan::DEVICE_EXTENSIONS;
use crate::vulkan::{VkInstance, VkSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamiliesIndices {
    pub graphics_family: u32,
    pub present_family: u32,
}

pub struct VkPhysicalDevice {
    pub inner: vk::PhysicalDevice,
    pub queue_families: QueueFamiliesIndices,
    pub memory_properties: vk::PhysicalDeviceMemoryProperties,
    pub name: String,
}

impl VkPhysicalDevice {
    pub fn new(instance: &VkInstance, surface: &VkSurface) -> Result<VkPhysicalDevice, String> {
        let (inner, queue_families) =
            VkPhysicalDevice::choose_physical_device(&instance.inner, &surface.loader, &surface.inner)?;

        let properties = unsafe { instance.inner.get_physical_device_properties(inner) };
        let memory_properties = unsafe { instance.inner.get_physical_device_memory_properties(inner) };

        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned();

        log::info!(target: "gpu", "Using physical device '{}'", name);

        return Ok(VkPhysicalDevice {
            inner,
            queue_families,
            memory_properties,
            name,
        });
    }

    fn choose_physical_device(
        instance: &Instance,
        surface_loader: &khr::surface::Instance,
        surface: &vk::SurfaceKHR,
    ) -> Result<(vk::PhysicalDevice, QueueFamiliesIndices), String> {
        let physical_devices = unsafe {
            instance
                .enumerate_physical_devices()
                .map_err(|e| format!("Failed to enumerate physical devices: {:?}", e))?
        };

        if physical_devices.is_empty() {
            return Err("No Vulkan-compatible physical devices found.".to_string());
        }

        let mut candidates: BTreeMap<u32, (vk::PhysicalDevice, QueueFamiliesIndices)> =
            BTreeMap::new();

        for inner in physical_devices {
            let queue_families =
                match VkPhysicalDevice::find_queue_families(instance, &inner, surface_loader, surface)
                {
                    Some(queue_families) => queue_families,
                    None => continue,
                };

            if !VkPhysicalDevice::supports_extensions(instance, &inner) {
                continue;
            }

            let score = VkPhysicalDevice::rate_device(instance, &inner);
            candidates.insert(score, (inner, queue_families));
        }

        return candidates
            .into_iter()
            .next_back()
            .map(|(_, candidate)| candidate)
            .ok_or_else(|| "Failed to find a suitable GPU.".to_string());
    }

    fn rate_device(instance: &Instance, inner: &vk::PhysicalDevice) -> u32 {
        let properties = unsafe { instance.get_physical_device_properties(*inner) };

        let mut score = 0;

        if properties.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
            score += 1000;
        }

        score += properties.limits.max_image_dimension2_d;

        return score;
    }

    fn supports_extensions(instance: &Instance, inner: &vk::PhysicalDevice) -> bool {
        let device_extensions = unsafe {
            instance
                .enumerate_device_extension_properties(*inner)
                .unwrap_or_default()
        };

        let mut required_extensions: HashSet<&CStr> = HashSet::from(DEVICE_EXTENSIONS);

        for extension in &device_extensions {
            let extension_name = unsafe { CStr::from_ptr(extension.extension_name.as_ptr()) };
            required_extensions.remove(extension_name);
        }

        return required_extensions.is_empty();
    }

    fn find_queue_families(
        instance: &Instance,
        inner: &vk::PhysicalDevice,
        surface_loader: &khr::surface::Instance,
        surface: &vk::SurfaceKHR,
    ) -> Option<QueueFamiliesIndices> {
        let mut graphics_family = None;
        let mut present_family = None;

        let queue_families =
            unsafe { instance.get_physical_device_queue_family_properties(*inner) };

        for (index, queue_family) in queue_families.iter().enumerate() {
            let index = index as u32;

            let graphics_flags = queue_family.queue_flags.contains(vk::QueueFlags::GRAPHICS);
            if graphics_family.is_none() && graphics_flags {
                graphics_family = Some(index);
            }

            let present_support = unsafe {
                surface_loader
                    .get_physical_device_surface_support(*inner, index, *surface)
                    .unwrap_or(false)
            };

            if present_support && present_family.is_none() {
                present_family = Some(index);
            }

            if graphics_family.is_some() && present_family.is_some() {
                break;
            }
        }

        return Some(QueueFamiliesIndices {
            graphics_family: graphics_family?,
            present_family: present_family?,
        });
    }

    pub fn find_memory_type(
        &self,
        type_filter: u32,
        properties: vk::MemoryPropertyFlags,
    ) -> Result<u32, String> {
        for index in 0..self.memory_properties.memory_type_count {
            if (type_filter & (1 << index) != 0)
                && self.memory_properties.memory_types[index as usize]
                    .property_flags
                    .contains(properties)
            {
                return Ok(index);
            }
        }

        return Err("Failed to find suitable memory type".to_string());
    }
}
