use ash::vk;

/// Maps a float count per vertex to the matching attribute format.
pub fn float_format(components: u32) -> Option<vk::Format> {
    return match components {
        1 => Some(vk::Format::R32_SFLOAT),
        2 => Some(vk::Format::R32G32_SFLOAT),
        3 => Some(vk::Format::R32G32B32_SFLOAT),
        4 => Some(vk::Format::R32G32B32A32_SFLOAT),
        _ => None,
    };
}

/// Vertex input state for non-interleaved streams: every attribute slot
/// reads from its own binding, at the same index.
pub struct VkVertexLayout {
    pub bindings: Vec<vk::VertexInputBindingDescription>,
    pub attributes: Vec<vk::VertexInputAttributeDescription>,
    /// Buffers to bind, in the order of `bindings`.
    pub buffers: Vec<vk::Buffer>,
}

impl VkVertexLayout {
    pub fn new() -> VkVertexLayout {
        return VkVertexLayout {
            bindings: Vec::new(),
            attributes: Vec::new(),
            buffers: Vec::new(),
        };
    }

    pub fn push(&mut self, slot: u32, buffer: vk::Buffer, components: u32) -> Result<(), String> {
        let format = float_format(components)
            .ok_or_else(|| format!("Unsupported component count {} for slot {}", components, slot))?;

        if self.bindings.iter().any(|binding| binding.binding == slot) {
            return Err(format!("Slot {} is bound twice", slot));
        }

        self.bindings.push(vk::VertexInputBindingDescription {
            binding: slot,
            stride: components * std::mem::size_of::<f32>() as u32,
            input_rate: vk::VertexInputRate::VERTEX,
        });

        self.attributes.push(vk::VertexInputAttributeDescription {
            binding: slot,
            location: slot,
            format,
            offset: 0,
        });

        self.buffers.push(buffer);
        return Ok(());
    }

    pub fn input_state(&self) -> vk::PipelineVertexInputStateCreateInfo<'_> {
        return vk::PipelineVertexInputStateCreateInfo {
            vertex_binding_description_count: self.bindings.len() as u32,
            p_vertex_binding_descriptions: self.bindings.as_ptr(),
            vertex_attribute_description_count: self.attributes.len() as u32,
            p_vertex_attribute_descriptions: self.attributes.as_ptr(),
            ..Default::default()
        };
    }
}
