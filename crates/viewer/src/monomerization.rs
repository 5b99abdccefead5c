//! Building `MonomerizationConfig`s from tilesets, clicks and coordinates.

use std::collections::BTreeMap;

use engine::loader::TilesetLoader;
use engine::primitives::TilesetOptions;
use formats::{
    AUTO_DETECT_SCALE, DEFAULT_HIGHLIGHT_ALPHA, DEFAULT_HIGHLIGHT_COLOR, Dimensions,
    HighlightStyle, ManualPlacement, MonomerizationConfig, Rotation, TilesetMetadata, Xyz,
    scaled_dimensions,
};
use foundation::math::{Vec3, ecef_from_degrees};
use tracing::{debug, error, info};

/// Optional overrides for generated configs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOptions {
    pub color: Option<String>,
    pub alpha: Option<f32>,
    pub rotation: Option<Rotation>,
    pub offset: Option<Xyz>,
}

impl ConfigOptions {
    pub fn style(&self) -> HighlightStyle {
        HighlightStyle::new(
            self.color
                .clone()
                .unwrap_or_else(|| DEFAULT_HIGHLIGHT_COLOR.to_string()),
            self.alpha.unwrap_or(DEFAULT_HIGHLIGHT_ALPHA),
        )
    }
}

/// Loads a tileset once to read its bounding sphere and properties.
pub async fn tileset_metadata(loader: &dyn TilesetLoader, url: &str) -> Option<TilesetMetadata> {
    match loader.load_tileset(url, TilesetOptions::default()).await {
        Ok(tileset) => {
            let mut metadata = TilesetMetadata::new(tileset.bounding_sphere());
            metadata.properties = tileset.properties;
            debug!(url, radius = metadata.bounding_sphere.radius, "tileset metadata");
            Some(metadata)
        }
        Err(err) => {
            error!(url, %err, "failed to read tileset metadata");
            None
        }
    }
}

/// Auto-detect config for a tileset that can actually be loaded.
pub async fn auto_generate_config(
    loader: &dyn TilesetLoader,
    url: &str,
    options: &ConfigOptions,
) -> Option<MonomerizationConfig> {
    tileset_metadata(loader, url).await?;
    Some(MonomerizationConfig::auto_detect(options.style()))
}

pub fn config_from_click(
    position: Vec3,
    dimensions: Dimensions,
    options: &ConfigOptions,
) -> MonomerizationConfig {
    MonomerizationConfig::manual(
        ManualPlacement {
            center: Xyz::from(position),
            dimensions,
            rotation: options.rotation,
            offset: options.offset,
        },
        options.style(),
    )
}

pub fn config_from_coordinates(
    longitude: f64,
    latitude: f64,
    height: f64,
    dimensions: Dimensions,
    options: &ConfigOptions,
) -> MonomerizationConfig {
    let position = Vec3::from(ecef_from_degrees(longitude, latitude, height));
    config_from_click(position, dimensions, options)
}

/// Box size for a bounding-sphere radius; `None` uses the auto-detect scale.
pub fn calculate_dimensions(radius: f64, scale: Option<Dimensions>) -> Dimensions {
    scaled_dimensions(radius, scale.unwrap_or(AUTO_DETECT_SCALE))
}

pub fn validate_config(config: &MonomerizationConfig) -> bool {
    match config.validate() {
        Ok(()) => true,
        Err(err) => {
            error!(%err, "invalid monomerization config");
            false
        }
    }
}

pub fn export_config(config: &MonomerizationConfig) -> Option<String> {
    match serde_json::to_string_pretty(config) {
        Ok(json) => Some(json),
        Err(err) => {
            error!(%err, "failed to export monomerization config");
            None
        }
    }
}

/// Parses and validates a config; invalid input is logged and rejected.
pub fn import_config(json: &str) -> Option<MonomerizationConfig> {
    let config: MonomerizationConfig = match serde_json::from_str(json) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "failed to import monomerization config");
            return None;
        }
    };
    validate_config(&config).then_some(config)
}

/// Auto-detect configs keyed by URL; tilesets that fail to load are skipped.
pub async fn batch_generate_configs(
    loader: &dyn TilesetLoader,
    urls: &[&str],
    options: &ConfigOptions,
) -> BTreeMap<String, MonomerizationConfig> {
    let mut configs = BTreeMap::new();
    for url in urls {
        if let Some(config) = auto_generate_config(loader, url, options).await {
            configs.insert((*url).to_string(), config);
        }
    }
    info!(count = configs.len(), "generated monomerization configs");
    configs
}
