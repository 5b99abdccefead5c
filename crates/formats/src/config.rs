use foundation::math::{HeadingPitchRoll, Vec3, ecef_from_degrees};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for Xyz {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Full edge lengths in meters along local east (length), north (width) and up (height).
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.length > 0.0 && self.width > 0.0 && self.height > 0.0
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.length, self.width, self.height)
    }
}

/// Heading/pitch/roll in radians.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Rotation {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Rotation {
    pub const fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }

    pub fn to_hpr(self) -> HeadingPitchRoll {
        HeadingPitchRoll::new(self.heading, self.pitch, self.roll)
    }
}

/// Geographic position in degrees, height in meters above the ellipsoid.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl MarkerPosition {
    pub const fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    pub fn to_ecef(self) -> Vec3 {
        Vec3::from(ecef_from_degrees(self.longitude, self.latitude, self.height))
    }

    pub fn raised(self, dh: f64) -> Self {
        Self::new(self.longitude, self.latitude, self.height + dh)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildingInfo {
    pub power_consumption: String,
    pub water_consumption: String,
    pub population: String,
}

impl BuildingInfo {
    /// Text shown in the building's info popup.
    pub fn label_text(&self) -> String {
        format!(
            "Power: {}\nWater: {}\nResidents: {}",
            self.power_consumption, self.water_consumption, self.population
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildingConfig {
    pub id: String,
    pub name: String,
    pub tileset_url: String,
    /// Highlight anchor in ECEF meters.
    pub center: Xyz,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub rotation: Rotation,
    /// Highlight offset in the anchor's east/north/up frame.
    #[serde(default)]
    pub offset: Xyz,
    pub color: String,
    pub marker: MarkerPosition,
    pub info: BuildingInfo,
}

impl BuildingConfig {
    pub fn marker_entity_id(&self) -> String {
        marker_entity_id(&self.id)
    }

    pub fn info_entity_id(&self) -> String {
        info_entity_id(&self.id)
    }

    pub fn cylinder_entity_id(&self) -> String {
        format!("{}_cylinder", self.id)
    }
}

pub fn marker_entity_id(building_id: &str) -> String {
    format!("{building_id}_marker")
}

pub fn info_entity_id(building_id: &str) -> String {
    format!("{building_id}_info")
}

/// One floor highlight volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub offset: Xyz,
    #[serde(default)]
    pub rotation: Rotation,
    pub dimensions: Dimensions,
    pub color: String,
    /// Height of the floor's click target above the ellipsoid.
    pub height: f64,
}

/// Camera pose applied when a scene becomes current; angles in degrees.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
}

impl CameraPose {
    pub const DEFAULT_HEADING_DEG: f64 = 0.0;
    pub const DEFAULT_PITCH_DEG: f64 = -90.0;
    pub const DEFAULT_ROLL_DEG: f64 = 0.0;

    pub fn top_down(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
            heading: None,
            pitch: None,
            roll: None,
        }
    }

    pub fn destination(&self) -> Vec3 {
        Vec3::from(ecef_from_degrees(self.longitude, self.latitude, self.height))
    }

    pub fn orientation(&self) -> HeadingPitchRoll {
        HeadingPitchRoll::from_degrees(
            self.heading.unwrap_or(Self::DEFAULT_HEADING_DEG),
            self.pitch.unwrap_or(Self::DEFAULT_PITCH_DEG),
            self.roll.unwrap_or(Self::DEFAULT_ROLL_DEG),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub buildings: Vec<BuildingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraPose>,
}

impl SceneConfig {
    pub fn building(&self, id: &str) -> Option<&BuildingConfig> {
        self.buildings.iter().find(|b| b.id == id)
    }
}
