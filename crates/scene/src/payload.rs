use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type of a pickable entity.
///
/// Serialized form is `{"cesiumType": ..., "buildingId": ...}`, the string protocol that
/// pickable entities carry in their display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cesiumType", rename_all = "camelCase")]
pub enum PickTag {
    CylinderBuilding {
        #[serde(rename = "buildingId", skip_serializing_if = "Option::is_none")]
        building_id: Option<String>,
    },
    BoxFlood,
    BuildingInfo {
        #[serde(rename = "buildingId", skip_serializing_if = "Option::is_none")]
        building_id: Option<String>,
    },
}

impl PickTag {
    pub fn cylinder_building(building_id: impl Into<String>) -> Self {
        PickTag::CylinderBuilding {
            building_id: Some(building_id.into()),
        }
    }

    pub fn building_info(building_id: impl Into<String>) -> Self {
        PickTag::BuildingInfo {
            building_id: Some(building_id.into()),
        }
    }

    pub fn cesium_type(&self) -> &'static str {
        match self {
            PickTag::CylinderBuilding { .. } => "cylinderBuilding",
            PickTag::BoxFlood => "boxFlood",
            PickTag::BuildingInfo { .. } => "buildingInfo",
        }
    }

    /// Encodes the tag as an entity display name.
    pub fn to_name(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{{\"cesiumType\":\"{}\"}}", self.cesium_type()))
    }

    /// Decodes a display name.
    ///
    /// `Ok(None)` means the name is a well-formed record whose `cesiumType` is missing or
    /// unrecognized; `Err` means the name is not a JSON record at all.
    pub fn from_name(name: &str) -> Result<Option<PickTag>, PayloadError> {
        let raw: RawTag =
            serde_json::from_str(name).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        let building_id = raw.building_id.filter(|id| !id.is_empty());
        Ok(match raw.cesium_type.as_deref() {
            Some("cylinderBuilding") => Some(PickTag::CylinderBuilding { building_id }),
            Some("boxFlood") => Some(PickTag::BoxFlood),
            Some("buildingInfo") => Some(PickTag::BuildingInfo { building_id }),
            _ => None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawTag {
    #[serde(rename = "cesiumType", default)]
    cesium_type: Option<String>,
    #[serde(rename = "buildingId", default)]
    building_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    Malformed(String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Malformed(e) => write!(f, "malformed pick payload: {e}"),
        }
    }
}

impl std::error::Error for PayloadError {}

#[cfg(test)]
mod tests {
    use super::{PayloadError, PickTag};

    #[test]
    fn encodes_legacy_protocol() {
        assert_eq!(
            PickTag::cylinder_building("building1").to_name(),
            r#"{"cesiumType":"cylinderBuilding","buildingId":"building1"}"#
        );
        assert_eq!(PickTag::BoxFlood.to_name(), r#"{"cesiumType":"boxFlood"}"#);
    }

    #[test]
    fn decodes_names_written_by_hand() {
        let tag = PickTag::from_name(r#"{"cesiumType": "boxFlood"}"#).expect("parse");
        assert_eq!(tag, Some(PickTag::BoxFlood));

        let tag = PickTag::from_name(r#"{"cesiumType":"cylinderBuilding"}"#).expect("parse");
        assert_eq!(tag, Some(PickTag::CylinderBuilding { building_id: None }));
    }

    #[test]
    fn empty_building_id_counts_as_absent() {
        let tag = PickTag::from_name(r#"{"cesiumType":"cylinderBuilding","buildingId":""}"#)
            .expect("parse");
        assert_eq!(tag, Some(PickTag::CylinderBuilding { building_id: None }));
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        assert_eq!(PickTag::from_name(r#"{"cesiumType":"tree"}"#), Ok(None));
        assert_eq!(PickTag::from_name("{}"), Ok(None));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            PickTag::from_name("building1"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(PickTag::from_name("null").is_err());
    }
}
