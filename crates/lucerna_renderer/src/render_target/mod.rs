pub mod gbuffer;

pub use gbuffer::GBuffer;
