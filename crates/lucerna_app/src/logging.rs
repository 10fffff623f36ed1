//! `fern` dispatcher for the `log` facade.

use std::time::Instant;

/// Crates whose output is capped at `warn` regardless of `level`.
const NOISY: [&str; 4] = ["wgpu_core", "wgpu_hal", "naga", "wgpu"];

/// Logs to stdout as `[seconds LEVEL target] message`.
///
/// Fails if a logger is already installed.
pub fn init(level: log::LevelFilter) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{:>9.3} {:<5} {}] {}",
                start.elapsed().as_secs_f64(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level);
    for target in NOISY {
        dispatch = dispatch.level_for(target, level.min(log::LevelFilter::Warn));
    }
    dispatch.chain(std::io::stdout()).apply()?;
    Ok(())
}
