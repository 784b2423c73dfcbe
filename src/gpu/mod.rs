//! The narrow contracts the asset pipeline needs from a graphics backend.
//!
//! Every handle is an owning, move-only token: it is created by one
//! `GpuDevice` call and given back exactly once through the matching
//! `release_*` call. Nothing is reclaimed implicitly.

pub mod shader;
pub mod texture;

use crate::error::Result;

pub use shader::{Program, ShaderSource, ShaderStage};
pub use texture::{RgbaPixels, Texture};

/// Vertex attribute slot of the position stream.
pub const POSITION_SLOT: u32 = 0;
/// Vertex attribute slot of the normal stream.
pub const NORMAL_SLOT: u32 = 1;
/// Vertex attribute slot of the texture coordinate stream.
pub const TEXCOORD_SLOT: u32 = 2;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a backend specific id. Only backends should mint handles.
            pub fn new(id: u64) -> Self {
                return $name(id);
            }

            pub fn id(&self) -> u64 {
                return self.0;
            }
        }
    };
}

handle!(
    /// A vertex buffer of 32-bit floats.
    BufferHandle
);
handle!(
    /// A sampled 2D RGBA texture.
    TextureHandle
);
handle!(
    /// Binds vertex buffers to attribute slots.
    LayoutHandle
);
handle!(
    /// A linked shader program.
    ProgramHandle
);

/// One vertex stream of a layout.
#[derive(Debug, Clone, Copy)]
pub struct VertexBinding<'a> {
    pub slot: u32,
    pub buffer: &'a BufferHandle,
    pub components: u32,
}

pub trait GpuDevice {
    /// Uploads `values` as a vertex buffer holding `components` floats per
    /// vertex, destined for attribute `slot`.
    fn upload_float_buffer(
        &mut self,
        values: &[f32],
        slot: u32,
        components: u32,
    ) -> Result<BufferHandle>;

    fn upload_texture(&mut self, pixels: &RgbaPixels) -> Result<TextureHandle>;

    fn create_vertex_layout(&mut self, bindings: &[VertexBinding<'_>]) -> Result<LayoutHandle>;

    /// Compiles every stage and links them into one program. Driver
    /// diagnostics are passed through verbatim.
    fn compile_program(&mut self, sources: &[ShaderSource<'_>]) -> Result<ProgramHandle>;

    fn release_buffer(&mut self, buffer: BufferHandle);

    fn release_texture(&mut self, texture: TextureHandle);

    fn release_layout(&mut self, layout: LayoutHandle);

    fn release_program(&mut self, program: ProgramHandle);
}
