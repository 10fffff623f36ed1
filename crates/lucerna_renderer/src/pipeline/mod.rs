pub mod blit;
pub mod geometry;
pub mod layout;
pub mod light;
pub mod overlay;
pub mod uniforms;
pub mod validate;

pub use blit::BlitPipelines;
pub use geometry::GeometryPipeline;
pub use layout::PipelineLayouts;
pub use light::LightPipelines;
pub use overlay::{SkyPipeline, WirePipeline};
