mod buffers;
pub mod face;
mod geometry;

pub use buffers::*;
pub use face::{Corner, Face, FaceSyntax, Index};
pub use geometry::*;
