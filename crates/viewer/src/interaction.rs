use engine::{PickedObject, RenderEngine};
use formats::{BuildingConfig, LayerConfig};
use foundation::math::{HeadingPitchRange, Vec2};
use runtime::{EventDisposition, EventHandler, InputEvent, InputKind};
use scene::payload::PickTag;
use tracing::{debug, error, info, warn};

use crate::building::BuildingManager;
use crate::highlight::HighlightManager;
use crate::model_info::to_geodetic;

/// Building id assumed when a `cylinderBuilding` tag carries none.
pub const DEFAULT_BUILDING_ID: &str = "building1";

pub const ZOOM_SPEED: f64 = 0.1;
pub const MIN_ZOOM_DISTANCE: f64 = 10.0;
pub const MAX_ZOOM_DISTANCE: f64 = 10_000.0;

/// Camera-to-target distance after one wheel tick.
///
/// Positive deltas (scrolling down) move away from the target.
pub fn zoomed_distance(distance: f64, wheel_delta: f64) -> f64 {
    let factor = if wheel_delta > 0.0 {
        1.0 + ZOOM_SPEED
    } else {
        1.0 - ZOOM_SPEED
    };
    (distance * factor).clamp(MIN_ZOOM_DISTANCE, MAX_ZOOM_DISTANCE)
}

/// What a left click ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Highlights cleared and info labels hidden.
    Deselected,
    BuildingHighlighted(String),
    UnknownBuilding(String),
    LayerHighlighted(String),
    /// A tagged entity that needs no action, or a floor without a layer config.
    Ignored,
}

/// Routes surface input to the highlight and building managers.
#[derive(Debug)]
pub struct InteractionManager {
    handler: EventHandler,
    highlights: HighlightManager,
    buildings: BuildingManager,
    building_configs: Vec<BuildingConfig>,
    layer_configs: Vec<LayerConfig>,
    mouse_down: bool,
}

impl InteractionManager {
    pub fn new(
        highlights: HighlightManager,
        buildings: BuildingManager,
        building_configs: Vec<BuildingConfig>,
        layer_configs: Vec<LayerConfig>,
    ) -> Self {
        let mut handler = EventHandler::new();
        for kind in [
            InputKind::Wheel,
            InputKind::MouseMove,
            InputKind::LeftDown,
            InputKind::LeftUp,
            InputKind::LeftClick,
            InputKind::LeftDoubleClick,
            InputKind::ContextMenu,
            InputKind::KeyDown,
        ] {
            handler.set_input_action(kind);
        }
        Self {
            handler,
            highlights,
            buildings,
            building_configs,
            layer_configs,
            mouse_down: false,
        }
    }

    pub fn highlights(&self) -> &HighlightManager {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut HighlightManager {
        &mut self.highlights
    }

    pub fn buildings(&self) -> &BuildingManager {
        &self.buildings
    }

    pub fn buildings_mut(&mut self) -> &mut BuildingManager {
        &mut self.buildings
    }

    pub fn building_configs(&self) -> &[BuildingConfig] {
        &self.building_configs
    }

    /// Swaps the lookup tables, e.g. after a scene change.
    pub fn set_building_configs(&mut self, configs: Vec<BuildingConfig>) {
        self.building_configs = configs;
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    pub fn handle_event(
        &mut self,
        engine: &mut dyn RenderEngine,
        event: &InputEvent,
    ) -> EventDisposition {
        if !self.handler.accepts(event) {
            return EventDisposition::ignored();
        }
        match event {
            InputEvent::Wheel { delta_y, position } => {
                self.zoom(engine, *delta_y, *position);
                EventDisposition::prevented()
            }
            InputEvent::ContextMenu { .. } | InputEvent::LeftDoubleClick { .. } => {
                EventDisposition::prevented()
            }
            InputEvent::LeftDown { .. } => {
                self.mouse_down = true;
                EventDisposition::handled()
            }
            InputEvent::LeftUp { .. } => {
                self.mouse_down = false;
                EventDisposition::handled()
            }
            InputEvent::MouseMove { .. } => {
                if self.mouse_down {
                    self.deselect(engine);
                }
                EventDisposition::handled()
            }
            InputEvent::LeftClick { position } => {
                self.handle_click(engine, *position);
                EventDisposition::handled()
            }
            InputEvent::KeyDown { key } if key.eq_ignore_ascii_case("r") => {
                self.reset_view(engine);
                EventDisposition::handled()
            }
            InputEvent::KeyDown { .. } => EventDisposition::ignored(),
        }
    }

    /// Moves the camera toward or away from the point under the cursor.
    ///
    /// Falls back to the first primitive's center when nothing is under the cursor.
    /// Returns the new camera-to-target distance, or `None` when there is no target.
    pub fn zoom(
        &mut self,
        engine: &mut dyn RenderEngine,
        wheel_delta: f64,
        screen: Vec2,
    ) -> Option<f64> {
        let target = engine.pick_position(screen).or_else(|| {
            engine
                .primitives()
                .first()
                .map(|(_, primitive)| primitive.bounding_sphere().center)
        })?;

        let to_camera = engine.camera().position - target;
        let direction = to_camera.normalize()?;
        let distance = zoomed_distance(to_camera.length(), wheel_delta);
        engine.camera_mut().position = target + direction.scale(distance);
        debug!(distance, "zoomed");
        Some(distance)
    }

    pub fn handle_click(&mut self, engine: &mut dyn RenderEngine, screen: Vec2) -> ClickOutcome {
        debug!(x = screen.x, y = screen.y, "left click");
        let Some(picked) = engine.pick(screen) else {
            return self.deselect(engine);
        };

        if let Some(position) = engine.pick_position(screen) {
            let geo = to_geodetic(position);
            info!(
                longitude = %format!("{:.15}", geo.lon_deg()),
                latitude = %format!("{:.15}", geo.lat_deg()),
                height = %format!("{:.2}", geo.alt_m),
                "clicked position"
            );
        }

        match picked {
            PickedObject::Entity { id, name, tag, .. } => {
                self.handle_entity_click(engine, &id, name.as_deref(), tag)
            }
            PickedObject::Primitive { .. } => self.deselect(engine),
        }
    }

    fn handle_entity_click(
        &mut self,
        engine: &mut dyn RenderEngine,
        entity_id: &str,
        name: Option<&str>,
        tag: Option<PickTag>,
    ) -> ClickOutcome {
        let tag = match (tag, name) {
            (Some(tag), _) => Some(tag),
            (None, None) => return self.deselect(engine),
            (None, Some(name)) => match PickTag::from_name(name) {
                Ok(tag) => tag,
                Err(err) => {
                    error!(entity = entity_id, %err, "failed to parse pick payload");
                    return self.deselect(engine);
                }
            },
        };

        match tag {
            Some(PickTag::CylinderBuilding { building_id }) => {
                let building_id = building_id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| DEFAULT_BUILDING_ID.to_string());
                info!(building = %building_id, "building clicked");
                self.highlight_building(engine, &building_id)
            }
            Some(PickTag::BoxFlood) => self.highlight_layer(engine, entity_id),
            Some(PickTag::BuildingInfo { .. }) | None => ClickOutcome::Ignored,
        }
    }

    fn highlight_building(
        &mut self,
        engine: &mut dyn RenderEngine,
        building_id: &str,
    ) -> ClickOutcome {
        let Some(config) = self.building_configs.iter().find(|c| c.id == building_id) else {
            warn!(building = building_id, "no config for clicked building");
            return ClickOutcome::UnknownBuilding(building_id.to_string());
        };
        self.buildings.hide_all_building_info(engine, &self.building_configs);
        self.highlights.create_building_highlight(engine, config);
        self.buildings.show_building_info(engine, &config.id);
        ClickOutcome::BuildingHighlighted(config.id.clone())
    }

    fn highlight_layer(&mut self, engine: &mut dyn RenderEngine, layer_id: &str) -> ClickOutcome {
        let Some(layer) = self.layer_configs.iter().find(|l| l.id == layer_id) else {
            debug!(layer = layer_id, "no layer config for clicked floor");
            return ClickOutcome::Ignored;
        };
        self.highlights.create_layer_highlight(engine, layer);
        ClickOutcome::LayerHighlighted(layer.id.clone())
    }

    /// Clears every highlight and hides every info label.
    pub fn deselect(&mut self, engine: &mut dyn RenderEngine) -> ClickOutcome {
        debug!("deselect");
        self.highlights.clear_all(engine);
        self.buildings.hide_all_building_info(engine, &self.building_configs);
        ClickOutcome::Deselected
    }

    /// Frames the first primitive from straight above.
    pub fn reset_view(&mut self, engine: &mut dyn RenderEngine) -> bool {
        let Some((first, _)) = engine.primitives().first() else {
            debug!("nothing to reset the view to");
            return false;
        };
        let offset = HeadingPitchRange::new(0.0, -std::f64::consts::FRAC_PI_2, 0.0);
        match engine.zoom_to(first, offset) {
            Ok(()) => true,
            Err(err) => {
                error!(%err, "failed to reset view");
                false
            }
        }
    }

    /// Unbinds input; later events are ignored.
    pub fn destroy(&mut self) {
        self.handler.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.handler.is_destroyed()
    }
}
