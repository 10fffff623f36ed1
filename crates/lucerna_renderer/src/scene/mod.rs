pub mod culling;
pub mod drawable;
pub mod skybox;

pub use culling::{cull, footprint, CullStats, Footprint};
pub use drawable::{Backdrop, DrawList, MeshDrawable, SceneContents, TerrainSource};
pub use skybox::GradientSkybox;
