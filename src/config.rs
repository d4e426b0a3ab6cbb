// =============================================================================
// CONFIGURATION - Load settings from config.toml
// =============================================================================
//
// Every setting is optional. The defaults reproduce the fixed tutorial
// setup: a 1200x600 "Tutorial" window, OpenGL 4.6 core, black background.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub gl: GlConfig,
    pub graphics: GraphicsConfig,
    pub shaders: ShaderConfig,
    pub debug: DebugConfig,
}

/// Window settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tutorial".to_string(),
            width: 1200,
            height: 600,
        }
    }
}

/// Requested context version (always core profile)
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GlConfig {
    pub major: u8,
    pub minor: u8,
}

impl Default for GlConfig {
    fn default() -> Self {
        Self { major: 4, minor: 6 }
    }
}

/// Graphics settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    pub clear_color: [f32; 4],
    pub vsync: bool,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
        }
    }
}

/// Shader settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Abort start-up on compile/link errors instead of logging them.
    pub strict: bool,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_to_file: bool,
    pub log_file: String,
    pub show_fps: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_to_file: false,
            log_file: "tri_gl.log".to_string(),
            show_fps: false,
        }
    }
}

impl Config {
    /// Load configuration from a specific path. A missing file is not an error.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
