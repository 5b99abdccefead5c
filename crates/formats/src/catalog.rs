use std::fmt;
use std::fs;
use std::path::Path;

use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::builtin;
use crate::config::{LayerConfig, SceneConfig, Xyz};

/// Everything the viewer needs to know about a deployment: scenes, floors, defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerCatalog {
    pub default_scene: String,
    pub scenes: Vec<SceneConfig>,
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    /// ECEF anchor for floor highlights; the built-in campus anchor when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_anchor: Option<Xyz>,
    /// Lon/lat (degrees) of the floor click targets; the built-in campus position when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_target: Option<[f64; 2]>,
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    UnknownDefaultScene(String),
    DuplicateScene(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "I/O error: {err}"),
            CatalogError::Parse(err) => write!(f, "Catalog parse error: {err}"),
            CatalogError::UnknownDefaultScene(id) => {
                write!(f, "Default scene is not in the catalog: {id}")
            }
            CatalogError::DuplicateScene(id) => write!(f, "Duplicate scene id: {id}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl ViewerCatalog {
    pub fn builtin() -> Self {
        Self {
            default_scene: builtin::DEFAULT_SCENE_ID.to_string(),
            scenes: builtin::all_scenes(),
            layers: builtin::layer_configs(),
            floor_anchor: None,
            floor_target: None,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let payload = fs::read_to_string(path.as_ref()).map_err(CatalogError::Io)?;
        Self::from_json(&payload)
    }

    pub fn from_json(payload: &str) -> Result<Self, CatalogError> {
        let catalog: ViewerCatalog = serde_json::from_str(payload).map_err(CatalogError::Parse)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(CatalogError::Parse)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for (i, scene) in self.scenes.iter().enumerate() {
            if self.scenes[..i].iter().any(|s| s.id == scene.id) {
                return Err(CatalogError::DuplicateScene(scene.id.clone()));
            }
        }
        if self.scene(&self.default_scene).is_none() {
            return Err(CatalogError::UnknownDefaultScene(
                self.default_scene.clone(),
            ));
        }
        Ok(())
    }

    pub fn scene(&self, id: &str) -> Option<&SceneConfig> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn layer(&self, id: &str) -> Option<&LayerConfig> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn floor_anchor(&self) -> Vec3 {
        self.floor_anchor
            .map(Xyz::to_vec3)
            .unwrap_or(builtin::FLOOR_HIGHLIGHT_ANCHOR)
    }

    pub fn floor_target(&self) -> (f64, f64) {
        self.floor_target
            .map(|[lon, lat]| (lon, lat))
            .unwrap_or(builtin::FLOOR_TARGET_LON_LAT)
    }
}
