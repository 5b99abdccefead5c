use std::collections::BTreeMap;
use std::fmt;

use foundation::bounds::BoundingSphere;
use foundation::color::{Color, ColorParseError};
use foundation::math::{HeadingPitchRoll, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{Dimensions, Rotation, Xyz};

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#F26419";
pub const DEFAULT_HIGHLIGHT_ALPHA: f32 = 0.6;

/// Box size derived from a bounding-sphere radius in auto-detect mode.
pub const AUTO_DETECT_SCALE: Dimensions = Dimensions::new(2.0, 1.5, 2.5);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HighlightStyle {
    pub color: String,
    pub alpha: f32,
}

impl HighlightStyle {
    pub fn new(color: impl Into<String>, alpha: f32) -> Self {
        Self {
            color: color.into(),
            alpha,
        }
    }

    pub fn resolve_color(&self) -> Result<Color, ColorParseError> {
        Ok(Color::from_css(&self.color)?.with_alpha(self.alpha))
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_COLOR, DEFAULT_HIGHLIGHT_ALPHA)
    }
}

/// Explicit highlight placement: anchor in ECEF, size, and a local rotation/offset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualPlacement {
    pub center: Xyz,
    pub dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Xyz>,
}

/// How to place one highlight volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonomerizationConfig {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub auto_detect: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual: Option<ManualPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<HighlightStyle>,
}

impl MonomerizationConfig {
    pub fn auto_detect(style: HighlightStyle) -> Self {
        Self {
            auto_detect: true,
            manual: None,
            style: Some(style),
        }
    }

    pub fn manual(placement: ManualPlacement, style: HighlightStyle) -> Self {
        Self {
            auto_detect: false,
            manual: Some(placement),
            style: Some(style),
        }
    }

    pub fn style_or_default(&self) -> HighlightStyle {
        self.style.clone().unwrap_or_default()
    }

    /// Structural check that does not need tileset metadata.
    pub fn validate(&self) -> Result<(), MonomerizationError> {
        if self.auto_detect {
            return Ok(());
        }
        match &self.manual {
            Some(manual) if !manual.dimensions.is_positive() => {
                Err(MonomerizationError::InvalidDimensions(manual.dimensions))
            }
            Some(_) => Ok(()),
            None => Err(MonomerizationError::MissingPlacement),
        }
    }

    /// Resolves the final box placement.
    ///
    /// Auto-detect wins when metadata is available; otherwise the manual placement is used.
    pub fn resolve(
        &self,
        metadata: Option<&TilesetMetadata>,
    ) -> Result<ResolvedPlacement, MonomerizationError> {
        let color = self
            .style_or_default()
            .resolve_color()
            .map_err(MonomerizationError::InvalidColor)?;

        if let (true, Some(metadata)) = (self.auto_detect, metadata) {
            let sphere = metadata.bounding_sphere();
            let dimensions = scaled_dimensions(sphere.radius, AUTO_DETECT_SCALE);
            if !dimensions.is_positive() {
                return Err(MonomerizationError::InvalidDimensions(dimensions));
            }
            return Ok(ResolvedPlacement {
                mode: PlacementMode::AutoDetect,
                center: sphere.center,
                dimensions,
                rotation: HeadingPitchRoll::default(),
                offset: Vec3::zero(),
                color,
            });
        }

        let Some(manual) = &self.manual else {
            return Err(if self.auto_detect {
                MonomerizationError::MissingMetadata
            } else {
                MonomerizationError::MissingPlacement
            });
        };
        if !manual.dimensions.is_positive() {
            return Err(MonomerizationError::InvalidDimensions(manual.dimensions));
        }

        Ok(ResolvedPlacement {
            mode: PlacementMode::Manual,
            center: manual.center.to_vec3(),
            dimensions: manual.dimensions,
            rotation: manual.rotation.unwrap_or_default().to_hpr(),
            offset: manual.offset.unwrap_or_default().to_vec3(),
            color,
        })
    }
}

pub fn scaled_dimensions(radius: f64, scale: Dimensions) -> Dimensions {
    Dimensions::new(
        radius * scale.length,
        radius * scale.width,
        radius * scale.height,
    )
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlacementMode {
    AutoDetect,
    Manual,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolvedPlacement {
    pub mode: PlacementMode,
    pub center: Vec3,
    pub dimensions: Dimensions,
    pub rotation: HeadingPitchRoll,
    pub offset: Vec3,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct SphereRecord {
    pub center: Xyz,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TilesetMetadata {
    pub bounding_sphere: SphereRecord,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl TilesetMetadata {
    pub fn new(sphere: BoundingSphere) -> Self {
        Self {
            bounding_sphere: SphereRecord {
                center: Xyz::from(sphere.center),
                radius: sphere.radius,
            },
            properties: BTreeMap::new(),
        }
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(
            self.bounding_sphere.center.to_vec3(),
            self.bounding_sphere.radius,
        )
    }
}

#[derive(Debug)]
pub enum MonomerizationError {
    MissingPlacement,
    MissingMetadata,
    InvalidDimensions(Dimensions),
    InvalidColor(ColorParseError),
    Json(serde_json::Error),
}

impl fmt::Display for MonomerizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonomerizationError::MissingPlacement => {
                write!(f, "config has neither autoDetect nor a manual placement")
            }
            MonomerizationError::MissingMetadata => {
                write!(f, "autoDetect requires tileset metadata")
            }
            MonomerizationError::InvalidDimensions(d) => write!(
                f,
                "dimensions must be positive (length={}, width={}, height={})",
                d.length, d.width, d.height
            ),
            MonomerizationError::InvalidColor(err) => write!(f, "invalid highlight color: {err}"),
            MonomerizationError::Json(err) => write!(f, "config JSON error: {err}"),
        }
    }
}

impl std::error::Error for MonomerizationError {}

#[cfg(test)]
mod tests {
    use super::{
        HighlightStyle, ManualPlacement, MonomerizationConfig, MonomerizationError,
        PlacementMode, TilesetMetadata,
    };
    use crate::config::{Dimensions, Rotation, Xyz};
    use foundation::bounds::BoundingSphere;
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;

    fn manual(dimensions: Dimensions) -> ManualPlacement {
        ManualPlacement {
            center: Xyz::new(1.0, 2.0, 3.0),
            dimensions,
            rotation: None,
            offset: None,
        }
    }

    #[test]
    fn auto_detect_scales_radius() {
        let config = MonomerizationConfig::auto_detect(HighlightStyle::default());
        let metadata = TilesetMetadata::new(BoundingSphere::new(Vec3::new(10.0, 0.0, 0.0), 40.0));

        let placement = config.resolve(Some(&metadata)).expect("resolve");
        assert_eq!(placement.mode, PlacementMode::AutoDetect);
        assert_eq!(placement.dimensions, Dimensions::new(80.0, 60.0, 100.0));
        assert_eq!(placement.center, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(placement.offset, Vec3::zero());
    }

    #[test]
    fn auto_detect_rejects_degenerate_sphere() {
        let config = MonomerizationConfig::auto_detect(HighlightStyle::default());
        for radius in [0.0, -5.0, f64::NAN] {
            let metadata = TilesetMetadata::new(BoundingSphere::new(Vec3::zero(), radius));
            assert!(matches!(
                config.resolve(Some(&metadata)),
                Err(MonomerizationError::InvalidDimensions(_))
            ));
        }
    }

    #[test]
    fn auto_detect_without_metadata_falls_back_to_manual() {
        let mut config = MonomerizationConfig::manual(
            manual(Dimensions::new(1.0, 1.0, 1.0)),
            HighlightStyle::default(),
        );
        config.auto_detect = true;
        let placement = config.resolve(None).expect("resolve");
        assert_eq!(placement.mode, PlacementMode::Manual);

        config.manual = None;
        assert!(matches!(
            config.resolve(None),
            Err(MonomerizationError::MissingMetadata)
        ));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let config = MonomerizationConfig::manual(
            manual(Dimensions::new(10.0, 0.0, 5.0)),
            HighlightStyle::default(),
        );
        assert!(matches!(
            config.validate(),
            Err(MonomerizationError::InvalidDimensions(_))
        ));
        assert!(config.resolve(None).is_err());
    }

    #[test]
    fn empty_config_is_invalid() {
        let config = MonomerizationConfig::default();
        assert!(matches!(
            config.validate(),
            Err(MonomerizationError::MissingPlacement)
        ));
    }

    #[test]
    fn style_alpha_applies_to_color() {
        let config = MonomerizationConfig::manual(
            manual(Dimensions::new(1.0, 1.0, 1.0)),
            HighlightStyle::new("#2932E1", 0.3),
        );
        let placement = config.resolve(None).expect("resolve");
        assert_eq!(placement.color.a, 0.3);
        assert_eq!(placement.color.b, 225.0 / 255.0);
    }

    #[test]
    fn bad_color_is_reported() {
        let config = MonomerizationConfig::manual(
            manual(Dimensions::new(1.0, 1.0, 1.0)),
            HighlightStyle::new("not-a-color", 0.6),
        );
        assert!(matches!(
            config.resolve(None),
            Err(MonomerizationError::InvalidColor(_))
        ));
    }

    #[test]
    fn json_uses_camel_case_and_omits_absent_fields() {
        let config = MonomerizationConfig::manual(
            ManualPlacement {
                center: Xyz::new(1.0, 2.0, 3.0),
                dimensions: Dimensions::new(65.0, 50.0, 160.0),
                rotation: Some(Rotation::new(0.4, 0.0, 0.0)),
                offset: None,
            },
            HighlightStyle::default(),
        );
        let value = serde_json::to_value(&config).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "manual": {
                    "center": {"x": 1.0, "y": 2.0, "z": 3.0},
                    "dimensions": {"length": 65.0, "width": 50.0, "height": 160.0},
                    "rotation": {"heading": 0.4, "pitch": 0.0, "roll": 0.0}
                },
                "style": {"color": "#F26419", "alpha": 0.6f32}
            })
        );

        let auto: MonomerizationConfig =
            serde_json::from_str(r#"{"autoDetect": true}"#).expect("parse");
        assert!(auto.auto_detect);
        assert!(auto.style.is_none());
    }
}
