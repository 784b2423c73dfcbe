use crate::vulkan::{VALIDATION_LAYERS, VALIDATION_LAYERS_ENABLED};

use std::ffi::{c_char, CStr};

use ash::{vk, Entry, Instance};

use raw_window_handle::HasDisplayHandle;
use winit::window::Window;

pub struct VkInstance {
    pub entry: Entry,
    pub inner: Instance,
}

impl VkInstance {
    pub fn new(window: &Window) -> Result<VkInstance, String> {
        let entry = Entry::linked();
        let inner = VkInstance::create_instance(&entry, window)?;

        return Ok(VkInstance { entry, inner });
    }

    fn validation_layers_supported(entry: &Entry) -> bool {
        let available_layers = match unsafe { entry.enumerate_instance_layer_properties() } {
            Ok(layers) => layers,
            Err(_) => return false,
        };

        return VALIDATION_LAYERS.iter().all(|&wanted| {
            available_layers.iter().any(|layer| {
                let name = unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) };
                name == wanted
            })
        });
    }

    fn create_instance(entry: &Entry, window: &Window) -> Result<Instance, String> {
        let application_info = vk::ApplicationInfo {
            api_version: vk::API_VERSION_1_3,
            ..Default::default()
        };

        let display_handle = window
            .display_handle()
            .map_err(|e| format!("Error with display: {}", e))?;

        let extension_names = ash_window::enumerate_required_extensions(display_handle.as_raw())
            .map_err(|e| format!("Error with extension: {}", e))?;

        let validation_layers: Vec<*const c_char> =
            VALIDATION_LAYERS.iter().map(|layer| layer.as_ptr()).collect();

        let mut create_info = vk::InstanceCreateInfo {
            p_application_info: &application_info,
            pp_enabled_extension_names: extension_names.as_ptr(),
            enabled_extension_count: extension_names.len() as u32,
            ..Default::default()
        };

        if VALIDATION_LAYERS_ENABLED {
            if VkInstance::validation_layers_supported(entry) {
                create_info.pp_enabled_layer_names = validation_layers.as_ptr();
                create_info.enabled_layer_count = validation_layers.len() as u32;
            } else {
                log::warn!(target: "gpu", "Validation layers requested but not available");
            }
        }

        let instance = unsafe {
            entry
                .create_instance(&create_info, None)
                .map_err(|e| format!("Failed to create Vulkan instance: {:?}", e))?
        };

        return Ok(instance);
    }
}

impl Drop for VkInstance {
    fn drop(&mut self) {
        unsafe {
            self.inner.destroy_instance(None);
        }
    }
}
