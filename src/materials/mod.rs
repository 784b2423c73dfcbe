pub mod library;
mod material;
mod resource;

pub use material::*;
pub use resource::*;
