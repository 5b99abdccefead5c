use std::collections::BTreeMap;

use engine::RenderEngine;
use engine::loader::TilesetLoader;
use engine::primitives::{Primitive, PrimitiveId, Tileset};
use formats::{SceneConfig, TilesetMetadata};
use runtime::{LoadGeneration, LoadTicket};
use tracing::{debug, error, info, warn};

use crate::building::tileset_options;
use crate::debug::log_tileset_position;

/// Registry of scenes plus the tilesets of the one that is active.
///
/// Only the active scene's tilesets are ever tracked: loading a scene tears the previous
/// one down before any new tileset is requested. Tilesets that complete under a superseded
/// load ticket are dropped instead of attached.
#[derive(Debug)]
pub struct SceneManager {
    scenes: BTreeMap<String, SceneConfig>,
    loaded: BTreeMap<String, PrimitiveId>,
    current: Option<String>,
    pending: Option<(LoadTicket, String)>,
    generation: LoadGeneration,
    debug: bool,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    pub fn new() -> Self {
        Self {
            scenes: BTreeMap::new(),
            loaded: BTreeMap::new(),
            current: None,
            pending: None,
            generation: LoadGeneration::new(),
            debug: runtime::debug_enabled_by_default(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Adds or overwrites a scene by id.
    pub fn register_scene(&mut self, scene: SceneConfig) {
        info!(scene = %scene.name, id = %scene.id, "scene registered");
        self.scenes.insert(scene.id.clone(), scene);
    }

    pub fn register_scenes(&mut self, scenes: impl IntoIterator<Item = SceneConfig>) {
        for scene in scenes {
            self.register_scene(scene);
        }
    }

    /// Loads every building tileset of a scene and applies its camera pose.
    ///
    /// Returns false when the scene is unknown or was superseded while loading.
    /// Individual tileset failures are logged and leave the building out.
    pub async fn load_scene(
        &mut self,
        engine: &mut dyn RenderEngine,
        loader: &dyn TilesetLoader,
        scene_id: &str,
    ) -> bool {
        let Some(ticket) = self.begin_scene(engine, scene_id) else {
            return false;
        };
        let buildings = self
            .scenes
            .get(scene_id)
            .map(|scene| scene.buildings.clone())
            .unwrap_or_default();

        for building in &buildings {
            match loader
                .load_tileset(&building.tileset_url, tileset_options())
                .await
            {
                Ok(tileset) => {
                    self.attach_tileset(engine, ticket, &building.id, tileset);
                }
                Err(err) => error!(building = %building.id, %err, "tileset failed to load"),
            }
        }

        self.finish_scene(engine, ticket)
    }

    /// Tears down the active scene and issues the ticket for loading `scene_id`.
    pub fn begin_scene(
        &mut self,
        engine: &mut dyn RenderEngine,
        scene_id: &str,
    ) -> Option<LoadTicket> {
        let Some(scene) = self.scenes.get(scene_id) else {
            error!(scene = scene_id, "scene does not exist");
            return None;
        };
        info!(scene = %scene.name, "loading scene");

        self.clear_current_scene(engine);
        let ticket = self.generation.begin();
        self.pending = Some((ticket, scene_id.to_string()));
        Some(ticket)
    }

    /// Adds a loaded tileset for `building_id` if `ticket` is still current.
    pub fn attach_tileset(
        &mut self,
        engine: &mut dyn RenderEngine,
        ticket: LoadTicket,
        building_id: &str,
        tileset: Tileset,
    ) -> Option<PrimitiveId> {
        if !self.generation.is_current(ticket) {
            warn!(
                building = building_id,
                ticket = ticket.generation(),
                "discarding tileset from a superseded scene load"
            );
            return None;
        }
        if self.debug {
            log_tileset_position(building_id, &tileset);
        }

        let id = engine.add_primitive(Primitive::Tileset(tileset));
        if let Some(previous) = self.loaded.insert(building_id.to_string(), id) {
            remove_tileset(engine, building_id, previous);
        }
        info!(building = building_id, %id, "tileset loaded");
        Some(id)
    }

    /// Applies the camera pose and marks the scene current; false for a stale ticket.
    pub fn finish_scene(&mut self, engine: &mut dyn RenderEngine, ticket: LoadTicket) -> bool {
        let scene_id = match self.pending.take() {
            Some((pending, scene_id))
                if pending == ticket && self.generation.is_current(ticket) =>
            {
                scene_id
            }
            other => {
                self.pending = other;
                debug!(ticket = ticket.generation(), "scene load superseded");
                return false;
            }
        };
        let Some(scene) = self.scenes.get(&scene_id) else {
            return false;
        };

        if let Some(camera) = &scene.camera {
            engine.fly_to(camera.destination(), camera.orientation());
        }
        info!(scene = %scene.name, tilesets = self.loaded.len(), "scene loaded");
        self.current = Some(scene_id);
        true
    }

    /// Removes every tileset of the active scene. Safe to call repeatedly.
    pub fn clear_current_scene(&mut self, engine: &mut dyn RenderEngine) {
        self.generation.invalidate();
        self.pending = None;
        for (building_id, id) in std::mem::take(&mut self.loaded) {
            remove_tileset(engine, &building_id, id);
        }
        self.current = None;
    }

    pub async fn tileset_metadata(
        &self,
        loader: &dyn TilesetLoader,
        url: &str,
    ) -> Option<TilesetMetadata> {
        crate::monomerization::tileset_metadata(loader, url).await
    }

    pub fn current_scene(&self) -> Option<&SceneConfig> {
        self.current.as_ref().and_then(|id| self.scenes.get(id))
    }

    pub fn current_scene_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn scene(&self, scene_id: &str) -> Option<&SceneConfig> {
        self.scenes.get(scene_id)
    }

    pub fn all_scenes(&self) -> impl Iterator<Item = &SceneConfig> + '_ {
        self.scenes.values()
    }

    pub fn loaded_tileset(&self, building_id: &str) -> Option<PrimitiveId> {
        self.loaded.get(building_id).copied()
    }

    pub fn loaded_building_ids(&self) -> Vec<&str> {
        self.loaded.keys().map(String::as_str).collect()
    }

    pub fn destroy(&mut self, engine: &mut dyn RenderEngine) {
        self.clear_current_scene(engine);
        self.scenes.clear();
    }
}

fn remove_tileset(engine: &mut dyn RenderEngine, building_id: &str, id: PrimitiveId) {
    match engine.remove_primitive(id) {
        Ok(_) => info!(building = building_id, "tileset removed"),
        Err(err) => warn!(building = building_id, %err, "failed to remove tileset"),
    }
}

#[cfg(test)]
mod tests {
    use super::SceneManager;
    use crate::building::TILESET_TRANSLATION;
    use engine::primitives::{Tileset, TilesetOptions};
    use engine::{HeadlessEngine, MemoryTilesetLoader, RenderEngine};
    use formats::builtin::all_scenes;
    use formats::{BuildingConfig, CameraPose, SceneConfig};
    use foundation::bounds::BoundingSphere;
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;

    fn loader_for(scenes: &[SceneConfig]) -> MemoryTilesetLoader {
        let loader = MemoryTilesetLoader::new();
        for scene in scenes {
            for building in &scene.buildings {
                loader.insert(
                    building.tileset_url.clone(),
                    BoundingSphere::new(building.center.to_vec3(), 100.0),
                );
            }
        }
        loader
    }

    fn scene(id: &str, building_ids: &[&str]) -> SceneConfig {
        let template = all_scenes()[0].buildings[0].clone();
        SceneConfig {
            id: id.to_string(),
            name: format!("Scene {id}"),
            description: None,
            buildings: building_ids
                .iter()
                .map(|b| BuildingConfig {
                    id: b.to_string(),
                    tileset_url: format!("/{b}/tileset.json"),
                    ..template.clone()
                })
                .collect(),
            camera: Some(CameraPose::top_down(113.06, 22.64, 800.0)),
        }
    }

    fn manager_with(scenes: &[SceneConfig]) -> SceneManager {
        let mut manager = SceneManager::new().with_debug(false);
        manager.register_scenes(scenes.iter().cloned());
        manager
    }

    #[test]
    fn switching_scenes_keeps_only_the_new_tilesets() {
        let scenes = vec![scene("sceneA", &["a1", "a2"]), scene("sceneB", &["b1"])];
        let loader = loader_for(&scenes);
        let mut engine = HeadlessEngine::default();
        let mut manager = manager_with(&scenes);

        assert!(pollster::block_on(manager.load_scene(&mut engine, &loader, "sceneA")));
        assert_eq!(manager.loaded_building_ids(), vec!["a1", "a2"]);
        let a1 = manager.loaded_tileset("a1").expect("a1");

        assert!(pollster::block_on(manager.load_scene(&mut engine, &loader, "sceneB")));
        assert_eq!(manager.loaded_building_ids(), vec!["b1"]);
        assert_eq!(manager.current_scene_id(), Some("sceneB"));
        assert!(!engine.primitives().contains(a1));
        assert_eq!(engine.primitives().len(), 1);

        let urls: Vec<String> = engine
            .primitives()
            .tilesets()
            .map(|(_, t)| t.url.clone())
            .collect();
        assert_eq!(urls, vec!["/b1/tileset.json".to_string()]);
    }

    #[test]
    fn tilesets_get_campus_translation() {
        let scenes = all_scenes();
        let loader = loader_for(&scenes);
        let mut engine = HeadlessEngine::default();
        let mut manager = manager_with(&scenes);

        assert!(pollster::block_on(manager.load_scene(&mut engine, &loader, "scene1")));
        for (_, tileset) in engine.primitives().tilesets() {
            assert_eq!(tileset.model_matrix.translation(), TILESET_TRANSLATION);
            assert_eq!(tileset.maximum_screen_space_error, 64.0);
        }
        let camera = manager.current_scene().and_then(|s| s.camera.clone()).expect("camera");
        assert_eq!(engine.last_flight(), Some((camera.destination(), camera.orientation())));
    }

    #[test]
    fn unknown_scene_changes_nothing() {
        let scenes = vec![scene("sceneA", &["a1"])];
        let loader = loader_for(&scenes);
        let mut engine = HeadlessEngine::default();
        let mut manager = manager_with(&scenes);
        assert!(pollster::block_on(manager.load_scene(&mut engine, &loader, "sceneA")));

        assert!(!pollster::block_on(manager.load_scene(&mut engine, &loader, "nope")));
        assert_eq!(manager.current_scene_id(), Some("sceneA"));
        assert_eq!(engine.primitives().len(), 1);
    }

    #[test]
    fn failed_tileset_leaves_building_out() {
        let scenes = vec![scene("sceneA", &["a1", "a2"])];
        let loader = loader_for(&scenes);
        loader.remove("/a2/tileset.json");
        let mut engine = HeadlessEngine::default();
        let mut manager = manager_with(&scenes);

        assert!(pollster::block_on(manager.load_scene(&mut engine, &loader, "sceneA")));
        assert_eq!(manager.loaded_building_ids(), vec!["a1"]);
        assert!(manager.loaded_tileset("a2").is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let scenes = vec![scene("sceneA", &["a1"])];
        let loader = loader_for(&scenes);
        let mut engine = HeadlessEngine::default();
        let mut manager = manager_with(&scenes);

        manager.clear_current_scene(&mut engine);
        assert!(pollster::block_on(manager.load_scene(&mut engine, &loader, "sceneA")));
        manager.clear_current_scene(&mut engine);
        manager.clear_current_scene(&mut engine);
        assert!(manager.current_scene().is_none());
        assert!(manager.loaded_building_ids().is_empty());
        assert!(engine.primitives().is_empty());
    }

    #[test]
    fn stale_tickets_are_discarded() {
        let scenes = vec![scene("sceneA", &["a1"]), scene("sceneB", &["b1"])];
        let mut engine = HeadlessEngine::default();
        let mut manager = manager_with(&scenes);
        let tileset = |url: &str| {
            Tileset::new(
                url,
                BoundingSphere::new(Vec3::new(1.0, 2.0, 3.0), 10.0),
                TilesetOptions::default(),
            )
        };

        let a = manager.begin_scene(&mut engine, "sceneA").expect("ticket a");
        let b = manager.begin_scene(&mut engine, "sceneB").expect("ticket b");

        let stale = manager.attach_tileset(&mut engine, a, "a1", tileset("/a1/tileset.json"));
        assert!(stale.is_none());
        assert!(engine.primitives().is_empty());
        assert!(!manager.finish_scene(&mut engine, a));

        let fresh = manager.attach_tileset(&mut engine, b, "b1", tileset("/b1/tileset.json"));
        assert!(fresh.is_some());
        assert!(manager.finish_scene(&mut engine, b));
        assert_eq!(manager.current_scene_id(), Some("sceneB"));
        assert_eq!(manager.loaded_building_ids(), vec!["b1"]);
    }

    #[test]
    fn registering_overwrites_by_id() {
        let mut manager = manager_with(&[scene("sceneA", &["a1"])]);
        manager.register_scene(scene("sceneA", &["x", "y"]));
        assert_eq!(manager.all_scenes().count(), 1);
        assert_eq!(manager.scene("sceneA").map(|s| s.buildings.len()), Some(2));

        let mut engine = HeadlessEngine::default();
        manager.destroy(&mut engine);
        assert_eq!(manager.all_scenes().count(), 0);
    }
}
