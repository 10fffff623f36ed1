pub mod buffer;
pub mod registry;
pub mod texture;
pub mod uniform_array;

pub use registry::{Material, MaterialDesc, MaterialHandle, MeshHandle, ResourceRegistry, TextureHandle};
pub use uniform_array::UniformArray;
