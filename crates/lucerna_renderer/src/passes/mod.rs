pub mod forward_pass;
pub mod gbuffer_debug_pass;
pub mod geometry_pass;
pub mod light_pass;

pub use forward_pass::ForwardStage;
pub use gbuffer_debug_pass::GBufferDebugStage;
pub use geometry_pass::GeometryStage;
pub use light_pass::LightStage;
