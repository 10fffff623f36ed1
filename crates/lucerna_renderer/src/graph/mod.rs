pub mod frame_packet;
pub mod stage;

pub use frame_packet::{CameraPacket, FramePacket, GeometryDraw, LightDraw, Viewport, WireDraw};
pub use stage::{FrameTargets, RenderStage};
