pub mod app;
pub mod assets;
pub mod camera;
pub mod error;
pub mod event;
pub mod gpu;
pub mod materials;
pub mod model;
pub mod objects;
pub mod scanner;
pub mod vulkan;

pub use assets::{AssetSource, FileSystem};
pub use error::{Error, Result};
pub use model::{DrawRange, DrawTarget, Model, Topology};
