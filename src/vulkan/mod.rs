mod backend;
mod buffer;
mod command;
mod device;
mod image;
mod instance;
mod physical_device;
mod queue;
mod shaders;
mod surface;
mod vertex;

pub use backend::*;
pub use buffer::*;
pub use command::*;
pub use device::*;
pub use image::*;
pub use instance::*;
pub use physical_device::*;
pub use queue::*;
pub use shaders::*;
pub use surface::*;
pub use vertex::*;

use ash::vk;
use std::ffi::CStr;

pub const VALIDATION_LAYERS_ENABLED: bool = cfg!(debug_assertions);
pub const VALIDATION_LAYERS: [&CStr; 1] = [c"VK_LAYER_KHRONOS_validation"];

pub const DEVICE_EXTENSIONS: [&CStr; 1] = [vk::KHR_SWAPCHAIN_NAME];
