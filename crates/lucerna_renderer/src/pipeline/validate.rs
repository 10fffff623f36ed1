/// Runs GPU object creation inside a validation error scope.
///
/// A shader that fails to compile or a pipeline whose layout does not match
/// its shader leaves the renderer unable to draw anything correct, so any
/// error captured here is fatal: it is logged with `label` and the process
/// aborts.
pub fn validated<T>(device: &wgpu::Device, label: &str, create: impl FnOnce() -> T) -> T {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        crate::error::fatal(format_args!("validation failed for '{label}'"), err);
    }
    value
}

/// Compiles a WGSL module under a validation scope.
pub fn shader(device: &wgpu::Device, label: &str, source: &'static str) -> wgpu::ShaderModule {
    validated(device, label, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })
}
