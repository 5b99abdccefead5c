use std::collections::BTreeMap;

use engine::RenderEngine;
use engine::primitives::{ClassificationPrimitive, Primitive, PrimitiveId};
use formats::builtin::{FLOOR_HIGHLIGHT_ANCHOR, is_floor_layer_id};
use formats::{
    BuildingConfig, HighlightStyle, LayerConfig, ManualPlacement, MonomerizationConfig,
    PlacementMode, ResolvedPlacement, TilesetMetadata, Xyz,
};
use foundation::math::{Vec3, placement_matrix};
use tracing::{debug, error, info, warn};

use crate::debug::log_highlight_position;
use crate::model_info::log_coordinate_info;

pub const BUILDING_HIGHLIGHT_ALPHA: f32 = 0.6;
pub const LAYER_HIGHLIGHT_ALPHA: f32 = 0.3;

/// One live highlight volume and what it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct MonomerizationResult {
    pub id: String,
    pub primitive: PrimitiveId,
    pub config: MonomerizationConfig,
    pub metadata: Option<TilesetMetadata>,
    pub placement: ResolvedPlacement,
}

/// Keeps at most one classification volume per id.
///
/// Every registered id maps to a primitive that is live in the engine, as long as the
/// engine is only mutated through this manager for those primitives.
#[derive(Debug)]
pub struct HighlightManager {
    highlights: BTreeMap<String, MonomerizationResult>,
    floor_anchor: Vec3,
    debug: bool,
}

impl Default for HighlightManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightManager {
    pub fn new() -> Self {
        Self {
            highlights: BTreeMap::new(),
            floor_anchor: FLOOR_HIGHLIGHT_ANCHOR,
            debug: runtime::debug_enabled_by_default(),
        }
    }

    pub fn with_floor_anchor(mut self, anchor: Vec3) -> Self {
        self.floor_anchor = anchor;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn floor_anchor(&self) -> Vec3 {
        self.floor_anchor
    }

    /// Replaces the highlight for `id`.
    ///
    /// Any previous volume for `id` is removed first, even when the new config turns out to
    /// be invalid.
    pub fn create_highlight(
        &mut self,
        engine: &mut dyn RenderEngine,
        id: &str,
        config: MonomerizationConfig,
        metadata: Option<TilesetMetadata>,
    ) -> Option<&MonomerizationResult> {
        self.clear_highlight(engine, id);

        let placement = match config.resolve(metadata.as_ref()) {
            Ok(placement) => placement,
            Err(err) => {
                error!(id, %err, "invalid monomerization config");
                return None;
            }
        };
        match placement.mode {
            PlacementMode::AutoDetect => debug!(
                id,
                center = ?placement.center,
                dimensions = ?placement.dimensions,
                "auto-detected placement"
            ),
            PlacementMode::Manual => debug!(
                id,
                center = ?placement.center,
                dimensions = ?placement.dimensions,
                "manual placement"
            ),
        }

        let model_matrix = placement_matrix(placement.center, placement.rotation, placement.offset);
        let primitive = engine.add_primitive(Primitive::Classification(
            ClassificationPrimitive::boxed(
                id,
                placement.dimensions.to_vec3(),
                model_matrix,
                placement.color,
            ),
        ));

        self.highlights.insert(
            id.to_string(),
            MonomerizationResult {
                id: id.to_string(),
                primitive,
                config,
                metadata,
                placement,
            },
        );
        info!(id, %primitive, "highlight created");
        self.highlights.get(id)
    }

    pub fn create_building_highlight(
        &mut self,
        engine: &mut dyn RenderEngine,
        building: &BuildingConfig,
    ) -> Option<&MonomerizationResult> {
        let center = building.center.to_vec3();
        log_coordinate_info(&building.name, center);
        if self.debug {
            log_highlight_position(
                &building.name,
                center,
                building.rotation,
                building.offset,
                building.dimensions,
            );
        }

        let config = MonomerizationConfig::manual(
            ManualPlacement {
                center: building.center,
                dimensions: building.dimensions,
                rotation: Some(building.rotation),
                offset: Some(building.offset),
            },
            HighlightStyle::new(building.color.clone(), BUILDING_HIGHLIGHT_ALPHA),
        );
        self.create_highlight(engine, &building.id, config, None)
    }

    /// Floor highlights share one anchor; the layer's offset places the slab.
    pub fn create_layer_highlight(
        &mut self,
        engine: &mut dyn RenderEngine,
        layer: &LayerConfig,
    ) -> Option<&MonomerizationResult> {
        let config = MonomerizationConfig::manual(
            ManualPlacement {
                center: Xyz::from(self.floor_anchor),
                dimensions: layer.dimensions,
                rotation: Some(layer.rotation),
                offset: Some(layer.offset),
            },
            HighlightStyle::new(layer.color.clone(), LAYER_HIGHLIGHT_ALPHA),
        );
        self.create_highlight(engine, &layer.id, config, None)
    }

    /// Removes the highlight for `id`; false when there was none.
    pub fn clear_highlight(&mut self, engine: &mut dyn RenderEngine, id: &str) -> bool {
        let Some(result) = self.highlights.remove(id) else {
            return false;
        };
        match engine.remove_primitive(result.primitive) {
            Ok(_) => info!(id, "highlight cleared"),
            Err(err) => warn!(id, %err, "highlight primitive already gone"),
        }
        true
    }

    /// Clears every highlight that is not a floor highlight.
    pub fn clear_building_highlight(&mut self, engine: &mut dyn RenderEngine) {
        self.clear_matching(engine, |id| !is_floor_layer_id(id));
    }

    /// Clears floor highlights only.
    pub fn clear_layer_highlight(&mut self, engine: &mut dyn RenderEngine) {
        self.clear_matching(engine, is_floor_layer_id);
    }

    pub fn clear_all(&mut self, engine: &mut dyn RenderEngine) {
        self.clear_matching(engine, |_| true);
    }

    pub fn destroy(&mut self, engine: &mut dyn RenderEngine) {
        self.clear_all(engine);
    }

    fn clear_matching(&mut self, engine: &mut dyn RenderEngine, keep: impl Fn(&str) -> bool) {
        let ids: Vec<String> = self
            .highlights
            .keys()
            .filter(|id| keep(id))
            .cloned()
            .collect();
        for id in ids {
            self.clear_highlight(engine, &id);
        }
    }

    pub fn get_highlight(&self, id: &str) -> Option<&MonomerizationResult> {
        self.highlights.get(id)
    }

    pub fn all_highlights(&self) -> impl Iterator<Item = &MonomerizationResult> + '_ {
        self.highlights.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.highlights.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }
}
