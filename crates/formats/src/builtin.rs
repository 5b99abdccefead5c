//! Campus data compiled into the binary.

use foundation::math::Vec3;

use crate::config::{
    BuildingConfig, BuildingInfo, CameraPose, Dimensions, LayerConfig, MarkerPosition, Rotation,
    SceneConfig, Xyz,
};

pub const DEFAULT_SCENE_ID: &str = "scene1";

/// Ids of the floor layers; highlight ids starting with one of these are floor highlights.
pub const FLOOR_LAYER_IDS: [&str; 4] = ["first", "second", "third", "four"];

/// Lon/lat (degrees) of the floor click targets.
pub const FLOOR_TARGET_LON_LAT: (f64, f64) = (113.06025929925363, 22.645596984482292);

/// ECEF anchor every floor highlight is placed relative to.
pub const FLOOR_HIGHLIGHT_ANCHOR: Vec3 =
    Vec3::new(-2306846.095427444, 5418737.767193025, 2440539.2209737385);

pub fn is_floor_layer_id(id: &str) -> bool {
    FLOOR_LAYER_IDS.iter().any(|prefix| id.starts_with(prefix))
}

pub fn building_configs() -> Vec<BuildingConfig> {
    vec![
        BuildingConfig {
            id: "building1".to_string(),
            name: "Building A6".to_string(),
            tileset_url: "/poly_b3dm/tileset.json".to_string(),
            center: Xyz::new(-2306928.4726084634, 5418717.874638036, 2440505.7478268957),
            dimensions: Dimensions::new(65.0, 50.0, 160.0),
            rotation: Rotation::new(0.4, 0.0, 0.0),
            offset: Xyz::new(-14.0, 17.0, 93.5),
            color: "#F26419".to_string(),
            marker: MarkerPosition::new(113.06090721905448, 22.645399902809583, 85.0),
            info: BuildingInfo {
                power_consumption: "25410kw-h".to_string(),
                water_consumption: "1149m³".to_string(),
                population: "56".to_string(),
            },
        },
        BuildingConfig {
            id: "building2".to_string(),
            name: "Building B1".to_string(),
            tileset_url: "/poly_b3dm/tileset.json".to_string(),
            center: Xyz::new(-2306930.0, 5418720.0, 2440500.0),
            dimensions: Dimensions::new(55.0, 50.0, 160.0),
            rotation: Rotation::new(0.4, 0.0, 0.0),
            offset: Xyz::new(-83.0, 50.0, 90.0),
            color: "#FF6B6B".to_string(),
            marker: MarkerPosition::new(113.060277174873093, 22.645483701548006, 100.0),
            info: BuildingInfo {
                power_consumption: "18500kw-h".to_string(),
                water_consumption: "950m³".to_string(),
                population: "42".to_string(),
            },
        },
    ]
}

pub fn layer_configs() -> Vec<LayerConfig> {
    let floor = |id: &str, name: &str, z: f64, color: &str| LayerConfig {
        id: id.to_string(),
        name: name.to_string(),
        offset: Xyz::new(0.0, 7.0, z),
        rotation: Rotation::default(),
        dimensions: Dimensions::new(65.0, 50.0, 4.0),
        color: color.to_string(),
        height: z,
    };
    vec![
        floor("first", "Floor 1", 18.7, "#D22809"),
        floor("second", "Floor 2", 23.0, "#2932E1"),
        floor("third", "Floor 3", 27.3, "#40C057"),
        floor("four", "Floor 4", 31.7, "#FF6600"),
    ]
}

pub fn scene1() -> SceneConfig {
    SceneConfig {
        id: "scene1".to_string(),
        name: "Poly campus".to_string(),
        description: Some("Campus model with two monomerized buildings".to_string()),
        buildings: building_configs(),
        camera: Some(CameraPose {
            heading: Some(0.0),
            pitch: Some(-90.0),
            roll: Some(0.0),
            ..CameraPose::top_down(113.06090721905448, 22.645399902809583, 1000.0)
        }),
    }
}

pub fn scene2() -> SceneConfig {
    SceneConfig {
        id: "scene2".to_string(),
        name: "Example project".to_string(),
        description: Some("Template showing how to configure another scene".to_string()),
        buildings: vec![BuildingConfig {
            id: "example_building1".to_string(),
            name: "Example building 1".to_string(),
            tileset_url: "/3dtiles/tileset.json".to_string(),
            center: Xyz::new(-2306928.0, 5418717.0, 2440505.0),
            dimensions: Dimensions::new(60.0, 50.0, 150.0),
            rotation: Rotation::default(),
            offset: Xyz::new(0.0, 0.0, 90.0),
            color: "#00FF00".to_string(),
            marker: MarkerPosition::new(113.06, 22.64, 100.0),
            info: BuildingInfo {
                power_consumption: "15000kw-h".to_string(),
                water_consumption: "800m³".to_string(),
                population: "40".to_string(),
            },
        }],
        camera: Some(CameraPose {
            heading: Some(0.0),
            pitch: Some(-90.0),
            roll: Some(0.0),
            ..CameraPose::top_down(113.06, 22.64, 800.0)
        }),
    }
}

pub fn all_scenes() -> Vec<SceneConfig> {
    vec![scene1(), scene2()]
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_SCENE_ID, FLOOR_HIGHLIGHT_ANCHOR, FLOOR_TARGET_LON_LAT, all_scenes,
        building_configs, is_floor_layer_id, layer_configs,
    };
    use foundation::math::{Ecef, Vec3, ecef_from_degrees, ecef_to_geodetic};
    use std::collections::BTreeSet;

    #[test]
    fn floor_prefixes() {
        for layer in layer_configs() {
            assert!(is_floor_layer_id(&layer.id));
        }
        assert!(is_floor_layer_id("first_annex"));
        assert!(!is_floor_layer_id("building1"));
        // Prefix match: anything starting with a floor name counts as a floor.
        assert!(is_floor_layer_id("fourth"));
    }

    #[test]
    fn scene_ids_are_unique_and_default_exists() {
        let scenes = all_scenes();
        assert!(scenes.iter().any(|s| s.id == DEFAULT_SCENE_ID));
        let ids: BTreeSet<_> = scenes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), scenes.len());
    }

    #[test]
    fn building_dimensions_are_positive() {
        for building in building_configs() {
            assert!(building.dimensions.is_positive(), "{}", building.id);
        }
    }

    #[test]
    fn floor_anchor_sits_near_floor_targets() {
        let (lon, lat) = FLOOR_TARGET_LON_LAT;
        let target = Vec3::from(ecef_from_degrees(lon, lat, 0.0));
        let anchor = ecef_to_geodetic(Ecef::from(FLOOR_HIGHLIGHT_ANCHOR));
        let anchor_ground = Vec3::from(ecef_from_degrees(anchor.lon_deg(), anchor.lat_deg(), 0.0));
        assert!(target.distance(anchor_ground) < 100.0);
    }
}
