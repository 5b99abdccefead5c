use engine::loader::TilesetLoader;
use engine::primitives::TilesetOptions;
use formats::Dimensions;
use foundation::bounds::BoundingSphere;
use foundation::math::{Ecef, Geodetic, Vec3, ecef_to_geodetic};
use tracing::{error, info};

/// Where a model sits: bounding-sphere center in ECEF and as lon/lat/height.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModelInfo {
    pub center: Vec3,
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
    pub radius: f64,
}

impl ModelInfo {
    pub fn from_sphere(sphere: BoundingSphere) -> Self {
        let geo = to_geodetic(sphere.center);
        Self {
            center: sphere.center,
            longitude: geo.lon_deg(),
            latitude: geo.lat_deg(),
            height: geo.alt_m,
            radius: sphere.radius,
        }
    }
}

pub(crate) fn to_geodetic(point: Vec3) -> Geodetic {
    ecef_to_geodetic(Ecef::from(point))
}

/// Loads a tileset only to report where it is.
pub async fn model_info(loader: &dyn TilesetLoader, url: &str) -> Option<ModelInfo> {
    match loader.load_tileset(url, TilesetOptions::default()).await {
        Ok(tileset) => {
            let info = ModelInfo::from_sphere(tileset.bounding_sphere());
            info!(
                url,
                longitude = info.longitude,
                latitude = info.latitude,
                height = info.height,
                radius = info.radius,
                "model position"
            );
            Some(info)
        }
        Err(err) => {
            error!(url, %err, "failed to read model info");
            None
        }
    }
}

/// Rough footprint of a model from its bounding-sphere radius.
pub fn model_dimensions(radius: f64) -> Dimensions {
    Dimensions::new(radius * 2.0, radius * 2.0 * 0.7, radius * 2.5)
}

pub fn log_coordinate_info(name: &str, center: Vec3) -> Geodetic {
    let geo = to_geodetic(center);
    info!(
        name,
        longitude = geo.lon_deg(),
        latitude = geo.lat_deg(),
        height = geo.alt_m,
        "center position"
    );
    geo
}
