//! Application configuration.
//!
//! Every value has a fixed default matching the classic tutorial window: a 600x600 window
//! titled "Game" at (100, 100), a 90° camera with planes at 0.2 and 1000, rendered through
//! OpenGL. Only the GPU backend can be overridden from the environment.

use crate::projection::ProjectionParams;

/// Environment variable selecting the GPU backends, e.g. `WGPU_BACKEND=vulkan,metal`.
pub const BACKEND_ENV: &str = "WGPU_BACKEND";

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    /// Inner size in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Outer position in physical pixels.
    pub x: i32,
    pub y: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Game".to_string(),
            width: 600,
            height: 600,
            x: 100,
            y: 100,
        }
    }
}

/// Top-level configuration consumed by [`App`](crate::App).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window: WindowConfig,

    /// Camera constants used on every resize.
    pub projection: ProjectionParams,

    /// GPU backends the instance may pick an adapter from.
    ///
    /// Defaults to OpenGL only.
    pub backends: wgpu::Backends,

    /// Swap behavior of the surface.
    ///
    /// `AutoVsync` is supported everywhere and falls back to FIFO.
    pub present_mode: wgpu::PresentMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            projection: ProjectionParams::default(),
            backends: wgpu::Backends::GL,
            present_mode: wgpu::PresentMode::AutoVsync,
        }
    }
}

impl AppConfig {
    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(BACKEND_ENV) {
            match parse_backends(&value) {
                Some(backends) => config.backends = backends,
                None => log::warn!("Ignoring {BACKEND_ENV}={value:?}: no known backend names"),
            }
        }
        config
    }
}

/// Parses a comma separated list of backend names.
///
/// Names are case-insensitive. Unknown names are skipped with a warning; `None` is returned
/// when nothing in the list was recognized.
pub fn parse_backends(list: &str) -> Option<wgpu::Backends> {
    let mut backends = wgpu::Backends::empty();
    let mut recognized = false;

    for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let backend = match name.to_ascii_lowercase().as_str() {
            "gl" | "gles" | "opengl" => wgpu::Backends::GL,
            "vulkan" | "vk" => wgpu::Backends::VULKAN,
            "metal" | "mtl" => wgpu::Backends::METAL,
            "dx12" | "d3d12" => wgpu::Backends::DX12,
            "webgpu" => wgpu::Backends::BROWSER_WEBGPU,
            "primary" => wgpu::Backends::PRIMARY,
            "secondary" => wgpu::Backends::SECONDARY,
            "all" => wgpu::Backends::all(),
            other => {
                log::warn!("Unknown backend {other:?} in {BACKEND_ENV}");
                continue;
            }
        };
        backends |= backend;
        recognized = true;
    }

    recognized.then_some(backends)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tutorial_window() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "Game");
        assert_eq!((config.window.width, config.window.height), (600, 600));
        assert_eq!((config.window.x, config.window.y), (100, 100));
        assert_eq!(config.projection, ProjectionParams::default());
        assert_eq!(config.backends, wgpu::Backends::GL);
    }

    #[test]
    fn parses_single_backend() {
        assert_eq!(parse_backends("vulkan"), Some(wgpu::Backends::VULKAN));
        assert_eq!(parse_backends("GL"), Some(wgpu::Backends::GL));
    }

    #[test]
    fn parses_backend_list() {
        assert_eq!(
            parse_backends("gl, metal"),
            Some(wgpu::Backends::GL | wgpu::Backends::METAL)
        );
    }

    #[test]
    fn skips_unknown_names() {
        assert_eq!(parse_backends("gl,glide"), Some(wgpu::Backends::GL));
        assert_eq!(parse_backends("glide"), None);
        assert_eq!(parse_backends(" , "), None);
    }
}
