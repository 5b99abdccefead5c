//! Minimal 3D Tiles `tileset.json` reader: enough to place and bound a tileset.

use std::collections::BTreeMap;
use std::fmt;

use foundation::bounds::BoundingSphere;
use foundation::math::{Geodetic, Mat4, Vec3, geodetic_to_ecef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TilesetDocument {
    pub asset: TilesetAsset,
    #[serde(default)]
    pub geometric_error: f64,
    pub root: TileNode,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TilesetAsset {
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TileNode {
    pub bounding_volume: BoundingVolume,
    #[serde(default)]
    pub geometric_error: f64,
    /// Column-major 4x4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<[f64; 16]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TileContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TileNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileContent {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BoundingVolume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere: Option<[f64; 4]>,
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    pub obb: Option<[f64; 12]>,
    /// `[west, south, east, north, min_height, max_height]`, radians and meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<[f64; 6]>,
}

#[derive(Debug)]
pub enum TilesetError {
    Parse(serde_json::Error),
    MissingBoundingVolume,
    InvalidBoundingVolume(&'static str),
}

impl fmt::Display for TilesetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilesetError::Parse(err) => write!(f, "tileset parse error: {err}"),
            TilesetError::MissingBoundingVolume => {
                write!(f, "root tile has no sphere, box or region bounding volume")
            }
            TilesetError::InvalidBoundingVolume(what) => {
                write!(f, "invalid bounding volume: {what}")
            }
        }
    }
}

impl std::error::Error for TilesetError {}

impl TilesetDocument {
    pub fn from_json(payload: &str) -> Result<Self, TilesetError> {
        serde_json::from_str(payload).map_err(TilesetError::Parse)
    }

    pub fn root_transform(&self) -> Mat4 {
        self.root
            .transform
            .map(Mat4::from_column_major)
            .unwrap_or(Mat4::IDENTITY)
    }

    /// World-space bounding sphere of the root tile, before any model matrix.
    pub fn bounding_sphere(&self) -> Result<BoundingSphere, TilesetError> {
        self.root.bounding_volume.to_sphere(&self.root_transform())
    }
}

impl BoundingVolume {
    pub fn sphere(center: Vec3, radius: f64) -> Self {
        Self {
            sphere: Some([center.x, center.y, center.z, radius]),
            ..Self::default()
        }
    }

    /// Sphere enclosing the volume; `transform` applies to sphere and box, never to region.
    pub fn to_sphere(&self, transform: &Mat4) -> Result<BoundingSphere, TilesetError> {
        if let Some([x, y, z, r]) = self.sphere {
            if r.is_nan() || r < 0.0 {
                return Err(TilesetError::InvalidBoundingVolume("negative sphere radius"));
            }
            let center = transform.transform_point(Vec3::new(x, y, z));
            return Ok(BoundingSphere::new(center, r * transform.max_scale()));
        }

        if let Some(b) = self.obb {
            let center = Vec3::new(b[0], b[1], b[2]);
            let u = Vec3::new(b[3], b[4], b[5]);
            let v = Vec3::new(b[6], b[7], b[8]);
            let w = Vec3::new(b[9], b[10], b[11]);
            let radius = (u + v + w).length();
            let center = transform.transform_point(center);
            return Ok(BoundingSphere::new(center, radius * transform.max_scale()));
        }

        if let Some([west, south, east, north, min_h, max_h]) = self.region {
            if west > east || south > north || min_h > max_h {
                return Err(TilesetError::InvalidBoundingVolume("inverted region"));
            }
            let mid_lon = (west + east) * 0.5;
            let mid_lat = (south + north) * 0.5;
            let mut points = Vec::with_capacity(12);
            for lat in [south, mid_lat, north] {
                for lon in [west, mid_lon, east] {
                    for h in [min_h, max_h] {
                        points.push(Vec3::from(geodetic_to_ecef(Geodetic::new(lat, lon, h))));
                    }
                }
            }
            return BoundingSphere::from_points(&points)
                .ok_or(TilesetError::InvalidBoundingVolume("empty region"));
        }

        Err(TilesetError::MissingBoundingVolume)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundingVolume, TilesetDocument, TilesetError};
    use foundation::math::{Mat4, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps={eps})");
    }

    #[test]
    fn sphere_volume_with_root_transform() {
        let json = r#"{
            "asset": {"version": "1.0"},
            "geometricError": 500,
            "root": {
                "boundingVolume": {"sphere": [1, 2, 3, 40]},
                "geometricError": 100,
                "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 100,200,300,1],
                "content": {"uri": "root.b3dm"}
            }
        }"#;
        let doc = TilesetDocument::from_json(json).expect("parse");
        let sphere = doc.bounding_sphere().expect("sphere");
        assert_eq!(sphere.center, Vec3::new(101.0, 202.0, 303.0));
        assert_close(sphere.radius, 40.0, 1e-12);
    }

    #[test]
    fn box_volume_encloses_corners() {
        let volume = BoundingVolume {
            obb: Some([0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 12.0]),
            ..BoundingVolume::default()
        };
        let sphere = volume.to_sphere(&Mat4::IDENTITY).expect("sphere");
        assert_close(sphere.radius, 13.0, 1e-12);
    }

    #[test]
    fn region_ignores_transform() {
        let deg = std::f64::consts::PI / 180.0;
        let volume = BoundingVolume {
            region: Some([
                113.060 * deg,
                22.645 * deg,
                113.061 * deg,
                22.646 * deg,
                0.0,
                100.0,
            ]),
            ..BoundingVolume::default()
        };
        let plain = volume.to_sphere(&Mat4::IDENTITY).expect("sphere");
        let moved = volume
            .to_sphere(&Mat4::from_translation(Vec3::new(1.0e6, 0.0, 0.0)))
            .expect("sphere");
        assert_eq!(plain, moved);
        assert!(plain.radius > 50.0 && plain.radius < 200.0);
    }

    #[test]
    fn missing_volume_is_an_error() {
        let json = r#"{"asset": {"version": "1.0"}, "root": {"boundingVolume": {}}}"#;
        let doc = TilesetDocument::from_json(json).expect("parse");
        assert!(matches!(
            doc.bounding_sphere(),
            Err(TilesetError::MissingBoundingVolume)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            TilesetDocument::from_json("<html>"),
            Err(TilesetError::Parse(_))
        ));
    }
}
