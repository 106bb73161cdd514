use std::fs;
use std::path::Path;

use prism_core::device::Device;
use prism_core::{PrismError, PrismResult};
use serde::Deserialize;

use crate::pipelines::PipelineVariantCache;

/// The `[renderer]` table of the settings file.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RendererSettings {
    pub wireframe: bool,
    pub backface_culling: bool,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct SettingsFile {
    renderer: RendererSettings,
}

impl RendererSettings {
    pub fn from_toml(source: &str) -> PrismResult<Self> {
        let file: SettingsFile =
            toml::from_str(source).map_err(|e| PrismError::Config(e.to_string()))?;
        Ok(file.renderer)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> PrismResult<Self> {
        if !path.exists() {
            log::info!("No settings at '{}', using defaults", path.display());
            return Ok(Self::default());
        }
        let source = fs::read_to_string(path)
            .map_err(|e| PrismError::Config(format!("failed to read '{}': {}", path.display(), e)))?;
        let settings = Self::from_toml(&source)?;
        log::info!("Loaded settings from '{}': {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn apply<D: Device>(&self, pipelines: &mut PipelineVariantCache<D>) {
        if self.wireframe {
            pipelines.set_polygon_mode(1);
        }
        if self.backface_culling {
            pipelines.set_culling_mode(1);
        }
    }
}
