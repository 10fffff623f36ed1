use std::path::Path;

use anyhow::Context as _;
use lucerna_renderer::RendererConfig;
use serde::{Deserialize, Serialize};

use crate::traits::LucernaApp;

/// Window, logging and renderer settings.
///
/// Every field has a default, so a TOML file may list only what it changes:
///
/// ```toml
/// title = "Lights"
/// log_level = "debug"
///
/// [renderer]
/// shrink_light_quads = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub resizable: bool,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub renderer: RendererConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Lucerna".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            resizable: true,
            log_level: "info".to_string(),
            renderer: RendererConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads a TOML file.  A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// Entry point.  Configure with the builder methods, then [`App::run`].
pub struct App<A: LucernaApp> {
    config: AppConfig,
    app_state: A,
}

impl<A: LucernaApp + 'static> App<A> {
    pub fn new(app_state: A) -> Self {
        Self {
            config: AppConfig::default(),
            app_state,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.config.resizable = resizable;
        self
    }

    pub fn with_log_level(mut self, level: log::LevelFilter) -> Self {
        self.config.log_level = level.to_string().to_lowercase();
        self
    }

    pub fn with_renderer_config(mut self, renderer: RendererConfig) -> Self {
        self.config.renderer = renderer;
        self
    }

    /// Installs logging, opens the window and runs the event loop until the
    /// window closes or the app requests exit.
    pub fn run(self) -> anyhow::Result<()> {
        crate::logging::init(self.config.log_level())?;
        crate::runner::run_internal(self.config, self.app_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            title = "Lights"
            log_level = "debug"

            [renderer]
            shrink_light_quads = false
            clear_color = { r = 0.1, g = 0.2, b = 0.3 }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.title, "Lights");
        assert_eq!(cfg.width, 1280);
        assert_eq!(cfg.log_level(), log::LevelFilter::Debug);
        assert!(!cfg.renderer.shrink_light_quads);
        assert_eq!(cfg.renderer.clear_color.a, 1.0);
        assert_eq!(cfg.renderer.z_far, 1000.0);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let cfg = AppConfig {
            log_level: "chatty".into(),
            ..AppConfig::default()
        };
        assert_eq!(cfg.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = AppConfig::load("definitely/not/here.toml").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn builder_level_round_trips() {
        struct Nothing;
        impl LucernaApp for Nothing {}
        let app = App::new(Nothing).with_log_level(log::LevelFilter::Trace);
        assert_eq!(app.config.log_level(), log::LevelFilter::Trace);
    }
}
