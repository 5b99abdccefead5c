use engine::RenderEngine;
use engine::loader::TilesetLoader;
use engine::primitives::{Primitive, PrimitiveId, TilesetOptions};
use formats::builtin::FLOOR_TARGET_LON_LAT;
use formats::{BuildingConfig, LayerConfig, info_entity_id};
use foundation::color::Color;
use foundation::math::{HeadingPitchRoll, Mat4, Vec2, Vec3, ecef_from_degrees};
use scene::components::{
    BoxGraphics, CylinderGraphics, DistanceDisplayCondition, LabelGraphics, PointGraphics,
    VerticalOrigin,
};
use scene::entity::Entity;
use scene::payload::PickTag;
use tracing::{error, info, warn};

/// Every campus tileset is shifted down by this much to sit on the terrain.
pub const TILESET_TRANSLATION: Vec3 = Vec3::new(0.0, 0.0, -170.0);
pub const TILESET_MAX_SCREEN_SPACE_ERROR: f64 = 64.0;

pub const FLY_TO_HEIGHT: f64 = 1000.0;
pub const MARKER_VISIBLE_RANGE: f64 = 500.0;
pub const INFO_LABEL_RAISE: f64 = 10.0;

/// Near-invisible material for volumes that only exist to be clicked.
pub const PICK_TARGET_ALPHA: f32 = 0.01;

pub const CYLINDER_LENGTH: f64 = 80.0;
pub const CYLINDER_RADIUS: f64 = 23.0;
pub const CYLINDER_HEADING_DEG: f64 = 140.0;
pub const CYLINDER_DROP: f64 = 20.0;

pub const LAYER_BOX_DIMENSIONS: Vec3 = Vec3::new(20.6, 47.0, 4.0);
pub const LAYER_BOX_HEADING_DEG: f64 = 116.0;

pub fn tileset_options() -> TilesetOptions {
    TilesetOptions {
        model_matrix: Mat4::from_translation(TILESET_TRANSLATION),
        maximum_screen_space_error: TILESET_MAX_SCREEN_SPACE_ERROR,
    }
}

/// Loads building tilesets and maintains their marker, info and click-target entities.
#[derive(Debug)]
pub struct BuildingManager {
    last_tileset: Option<PrimitiveId>,
    floor_target: (f64, f64),
}

impl Default for BuildingManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildingManager {
    pub fn new() -> Self {
        Self {
            last_tileset: None,
            floor_target: FLOOR_TARGET_LON_LAT,
        }
    }

    /// Lon/lat (degrees) where floor click targets are stacked.
    pub fn with_floor_target(mut self, longitude: f64, latitude: f64) -> Self {
        self.floor_target = (longitude, latitude);
        self
    }

    /// The most recent tileset added by `load_building`.
    pub fn last_tileset(&self) -> Option<PrimitiveId> {
        self.last_tileset
    }

    pub async fn load_building(
        &mut self,
        engine: &mut dyn RenderEngine,
        loader: &dyn TilesetLoader,
        config: &BuildingConfig,
    ) -> Option<PrimitiveId> {
        info!(building = %config.name, url = %config.tileset_url, "loading building");
        let tileset = match loader
            .load_tileset(&config.tileset_url, tileset_options())
            .await
        {
            Ok(tileset) => tileset,
            Err(err) => {
                error!(building = %config.name, %err, "failed to load building tileset");
                return None;
            }
        };

        let id = engine.add_primitive(Primitive::Tileset(tileset));
        self.last_tileset = Some(id);
        info!(building = %config.name, %id, "building tileset loaded");

        let destination = Vec3::from(ecef_from_degrees(
            config.marker.longitude,
            config.marker.latitude,
            FLY_TO_HEIGHT,
        ));
        engine.fly_to(destination, HeadingPitchRoll::top_down());

        self.add_building_marker(engine, config);
        Some(id)
    }

    /// Adds the `{id}_marker` point and the hidden `{id}_info` label, replacing earlier ones.
    pub fn add_building_marker(&self, engine: &mut dyn RenderEngine, config: &BuildingConfig) {
        let visible = Some(DistanceDisplayCondition::new(0.0, MARKER_VISIBLE_RANGE));

        let marker = Entity::new(config.marker_entity_id(), config.marker.to_ecef())
            .with_point(PointGraphics {
                pixel_size: 15.0,
                color: Color::YELLOW,
                outline_color: Color::WHITE,
                outline_width: 3.0,
                distance_display: visible,
            })
            .with_label(LabelGraphics {
                font: "16pt sans-serif".to_string(),
                fill_color: Color::YELLOW,
                outline_color: Color::BLACK,
                outline_width: 2.0,
                vertical_origin: VerticalOrigin::Top,
                pixel_offset: Vec2::new(0.0, -25.0),
                background: Some(Color::BLACK.with_alpha(0.7)),
                distance_display: visible,
                ..LabelGraphics::new(config.name.clone())
            });

        let info = Entity::new(
            config.info_entity_id(),
            config.marker.raised(INFO_LABEL_RAISE).to_ecef(),
        )
        .with_label(LabelGraphics {
            font: "12pt sans-serif".to_string(),
            fill_color: Color::WHITE,
            outline_color: Color::BLACK,
            outline_width: 2.0,
            vertical_origin: VerticalOrigin::Bottom,
            pixel_offset: Vec2::new(0.0, -10.0),
            background: Some(Color::BLACK.with_alpha(0.8)),
            show: false,
            distance_display: visible,
            ..LabelGraphics::new(config.info.label_text())
        });

        replace_entity(engine, marker, PickTag::cylinder_building(&config.id));
        replace_entity(engine, info, PickTag::building_info(&config.id));
        info!(building = %config.name, "marker added");
    }

    pub fn show_building_info(&self, engine: &mut dyn RenderEngine, building_id: &str) -> bool {
        engine.set_label_visible(&info_entity_id(building_id), true)
    }

    pub fn hide_all_building_info(
        &self,
        engine: &mut dyn RenderEngine,
        configs: &[BuildingConfig],
    ) {
        for config in configs {
            engine.set_label_visible(&config.info_entity_id(), false);
        }
    }

    /// Invisible cylinders around each building that route clicks to it.
    pub fn create_cylinder_entities(
        &self,
        engine: &mut dyn RenderEngine,
        configs: &[BuildingConfig],
    ) {
        for config in configs {
            let position = config.marker.raised(-CYLINDER_DROP).to_ecef();
            let mut cylinder = CylinderGraphics::new(
                CYLINDER_LENGTH,
                CYLINDER_RADIUS,
                Color::WHITE.with_alpha(PICK_TARGET_ALPHA),
            );
            cylinder.slices = 100;
            let entity = Entity::new(config.cylinder_entity_id(), position)
                .with_orientation(HeadingPitchRoll::from_degrees(CYLINDER_HEADING_DEG, 0.0, 0.0))
                .with_cylinder(cylinder);
            replace_entity(engine, entity, PickTag::cylinder_building(&config.id));
        }
    }

    /// One invisible slab per floor, keyed by the layer id.
    pub fn create_layer_entities(&self, engine: &mut dyn RenderEngine, layers: &[LayerConfig]) {
        let (longitude, latitude) = self.floor_target;
        for layer in layers {
            let position = Vec3::from(ecef_from_degrees(longitude, latitude, layer.height));
            let entity = Entity::new(layer.id.clone(), position)
                .with_orientation(HeadingPitchRoll::from_degrees(LAYER_BOX_HEADING_DEG, 0.0, 0.0))
                .with_box(BoxGraphics::new(
                    LAYER_BOX_DIMENSIONS,
                    Color::WHITE.with_alpha(PICK_TARGET_ALPHA),
                ));
            replace_entity(engine, entity, PickTag::BoxFlood);
        }
    }
}

fn replace_entity(engine: &mut dyn RenderEngine, entity: Entity, tag: PickTag) {
    engine.remove_entity(&entity.id);
    let id = entity.id.clone();
    if let Err(err) = engine.add_entity(entity, Some(tag)) {
        warn!(entity = %id, %err, "entity not added");
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildingManager, TILESET_TRANSLATION};
    use engine::primitives::Primitive;
    use engine::{HeadlessEngine, MemoryTilesetLoader, RenderEngine};
    use formats::builtin::{building_configs, layer_configs};
    use foundation::bounds::BoundingSphere;
    use foundation::math::{EnuFrame, Vec3, ecef_from_degrees};
    use scene::payload::PickTag;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps={eps})");
    }

    #[test]
    fn load_building_adds_tileset_marker_and_flies() {
        let building = &building_configs()[0];
        let center = building.marker.to_ecef();
        let loader = MemoryTilesetLoader::new()
            .with_tileset(&building.tileset_url, BoundingSphere::new(center, 80.0));
        let mut engine = HeadlessEngine::default();
        let mut buildings = BuildingManager::new();

        let id = pollster::block_on(buildings.load_building(&mut engine, &loader, building))
            .expect("loaded");
        assert_eq!(buildings.last_tileset(), Some(id));

        let Some(Primitive::Tileset(tileset)) = engine.primitives().get(id) else {
            panic!("expected tileset");
        };
        assert_eq!(tileset.maximum_screen_space_error, 64.0);
        assert_eq!(tileset.model_matrix.translation(), TILESET_TRANSLATION);

        let (destination, orientation) = engine.last_flight().expect("flew");
        let expected = Vec3::from(ecef_from_degrees(
            building.marker.longitude,
            building.marker.latitude,
            1000.0,
        ));
        assert_eq!(destination, expected);
        assert_close(orientation.pitch.to_degrees(), -90.0, 1e-12);

        assert!(engine.entity("building1_marker").is_some());
        let info = engine.entity("building1_info").expect("info");
        assert!(!info.label_visible());
        let up = (info.position() - engine.entity("building1_marker").expect("marker").position())
            .dot(EnuFrame::at(center).up);
        assert_close(up, 10.0, 1e-6);
    }

    #[test]
    fn load_failure_returns_none() {
        let loader = MemoryTilesetLoader::new();
        let mut engine = HeadlessEngine::default();
        let mut buildings = BuildingManager::new();
        let building = &building_configs()[0];

        let loaded = pollster::block_on(buildings.load_building(&mut engine, &loader, building));
        assert!(loaded.is_none());
        assert!(buildings.last_tileset().is_none());
        assert!(engine.primitives().is_empty());
        assert!(engine.entities().is_empty());
    }

    #[test]
    fn marker_entities_are_tagged() {
        let mut engine = HeadlessEngine::default();
        let buildings = BuildingManager::new();
        let building = &building_configs()[1];
        buildings.add_building_marker(&mut engine, building);
        buildings.add_building_marker(&mut engine, building);
        assert_eq!(engine.entities().len(), 2);

        let world = engine.entities();
        let marker = world.id_of("building2_marker").expect("marker");
        assert_eq!(
            world.pick_tag(marker),
            Some(&PickTag::cylinder_building("building2"))
        );
        assert_eq!(
            world.get(marker).and_then(|e| e.name.clone()).as_deref(),
            Some(r#"{"cesiumType":"cylinderBuilding","buildingId":"building2"}"#)
        );
        let info = world.id_of("building2_info").expect("info");
        assert_eq!(world.pick_tag(info), Some(&PickTag::building_info("building2")));
        let text = world
            .get(info)
            .and_then(|e| e.label.as_ref())
            .map(|l| l.text.clone())
            .expect("label");
        assert_eq!(text, "Power: 18500kw-h\nWater: 950m³\nResidents: 42");
    }

    #[test]
    fn info_labels_toggle() {
        let mut engine = HeadlessEngine::default();
        let buildings = BuildingManager::new();
        let configs = building_configs();
        for config in &configs {
            buildings.add_building_marker(&mut engine, config);
        }

        assert!(buildings.show_building_info(&mut engine, "building1"));
        assert!(buildings.show_building_info(&mut engine, "building2"));
        assert!(!buildings.show_building_info(&mut engine, "nope"));
        buildings.hide_all_building_info(&mut engine, &configs);

        for config in &configs {
            let info = engine.entity(&config.info_entity_id()).expect("info");
            assert!(!info.label_visible());
        }
    }

    #[test]
    fn click_targets_are_created_once_per_config() {
        let mut engine = HeadlessEngine::default();
        let buildings = BuildingManager::new();
        let configs = building_configs();
        let layers = layer_configs();

        buildings.create_cylinder_entities(&mut engine, &configs);
        buildings.create_layer_entities(&mut engine, &layers);
        buildings.create_layer_entities(&mut engine, &layers);
        assert_eq!(engine.entities().len(), configs.len() + layers.len());

        let world = engine.entities();
        let cylinder = world.id_of("building1_cylinder").expect("cylinder");
        assert_eq!(
            world.pick_tag(cylinder),
            Some(&PickTag::cylinder_building("building1"))
        );
        let entity = world.get(cylinder).expect("entity");
        assert_close(entity.transform.orientation.heading.to_degrees(), 140.0, 1e-9);

        let floor = world.id_of("third").expect("floor");
        assert_eq!(world.pick_tag(floor), Some(&PickTag::BoxFlood));
        let slab = world.get(floor).and_then(|e| e.box_graphics.as_ref()).expect("box");
        assert_eq!(slab.dimensions, Vec3::new(20.6, 47.0, 4.0));
    }
}
