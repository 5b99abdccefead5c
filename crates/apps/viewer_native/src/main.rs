mod script;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use engine::{FileTilesetLoader, HeadlessEngine, MemoryTilesetLoader, RenderEngine, TilesetLoader};
use formats::{BuildingConfig, ViewerCatalog, info_entity_id, marker_entity_id};
use foundation::bounds::BoundingSphere;
use runtime::{LogConfig, debug_enabled_by_default, init_logging};
use tracing::{error, info, warn};
use viewer::{BuildingManager, HighlightManager, InteractionManager, SceneManager};

use crate::script::{ScriptCommand, parse_script};

/// Radius of the stand-in tilesets used when no asset directory is given.
const PLACEHOLDER_RADIUS: f64 = 80.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless campus viewer driven by input scripts")]
struct Args {
    /// Directory that tileset URLs resolve against; placeholder tilesets when omitted
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Viewer catalog JSON; the built-in campus when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Scene to load first; the catalog default when omitted
    #[arg(long)]
    scene: Option<String>,

    /// Input script to replay after the scene loads
    #[arg(long)]
    script: Option<PathBuf>,

    /// Verbose diagnostics and position dumps; always on in debug builds
    #[arg(long)]
    debug: bool,
}

fn main() {
    if let Err(err) = real_main() {
        eprintln!("viewer_native: {err}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let debug = args.debug || debug_enabled_by_default();
    init_logging(&LogConfig::with_debug(debug)).map_err(|e| e.to_string())?;

    let catalog = match &args.catalog {
        Some(path) => ViewerCatalog::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => ViewerCatalog::builtin(),
    };
    let loader = tileset_loader(&args, &catalog);
    let commands = match &args.script {
        Some(path) => {
            let source =
                fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
            parse_script(&source).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => Vec::new(),
    };

    let mut engine = HeadlessEngine::default();
    let mut scenes = SceneManager::new().with_debug(debug);
    scenes.register_scenes(catalog.scenes.iter().cloned());

    let (longitude, latitude) = catalog.floor_target();
    let buildings = BuildingManager::new().with_floor_target(longitude, latitude);
    buildings.create_layer_entities(&mut engine, &catalog.layers);
    let highlights = HighlightManager::new()
        .with_floor_anchor(catalog.floor_anchor())
        .with_debug(debug);
    let mut interaction =
        InteractionManager::new(highlights, buildings, Vec::new(), catalog.layers.clone());

    let first_scene = args
        .scene
        .clone()
        .unwrap_or_else(|| catalog.default_scene.clone());
    if !switch_scene(&mut engine, loader.as_ref(), &mut scenes, &mut interaction, &first_scene) {
        return Err(format!("scene {first_scene} could not be loaded"));
    }

    for command in commands {
        match command {
            ScriptCommand::Input(event) => {
                let disposition = interaction.handle_event(&mut engine, &event);
                info!(
                    kind = ?event.kind(),
                    handled = disposition.handled,
                    prevented = disposition.default_prevented,
                    highlights = interaction.highlights().len(),
                    "input"
                );
            }
            ScriptCommand::Scene(scene_id) => {
                let loader = loader.as_ref();
                if !switch_scene(&mut engine, loader, &mut scenes, &mut interaction, &scene_id) {
                    warn!(scene = %scene_id, "scene switch failed");
                }
            }
        }
    }

    summarize(&engine, &scenes, &interaction);
    interaction.destroy();
    interaction.highlights_mut().destroy(&mut engine);
    scenes.destroy(&mut engine);
    Ok(())
}

fn tileset_loader(args: &Args, catalog: &ViewerCatalog) -> Box<dyn TilesetLoader> {
    if let Some(root) = &args.assets {
        info!(root = %root.display(), "loading tilesets from disk");
        return Box::new(FileTilesetLoader::new(root));
    }
    let loader = MemoryTilesetLoader::new();
    for building in catalog.scenes.iter().flat_map(|scene| &scene.buildings) {
        loader.insert(
            building.tileset_url.clone(),
            BoundingSphere::new(building.marker.to_ecef(), PLACEHOLDER_RADIUS),
        );
    }
    info!("no asset directory given, using placeholder tilesets");
    Box::new(loader)
}

/// Loads a scene and rebuilds the per-building markers and click targets.
fn switch_scene(
    engine: &mut HeadlessEngine,
    loader: &dyn TilesetLoader,
    scenes: &mut SceneManager,
    interaction: &mut InteractionManager,
    scene_id: &str,
) -> bool {
    let Some(scene) = scenes.scene(scene_id).cloned() else {
        error!(scene = scene_id, "unknown scene");
        return false;
    };

    interaction.deselect(engine);
    for old in interaction.building_configs() {
        remove_building_entities(engine, old);
    }

    if !pollster::block_on(scenes.load_scene(engine, loader, scene_id)) {
        interaction.set_building_configs(Vec::new());
        return false;
    }

    let buildings = interaction.buildings();
    for building in &scene.buildings {
        buildings.add_building_marker(engine, building);
    }
    buildings.create_cylinder_entities(engine, &scene.buildings);
    interaction.set_building_configs(scene.buildings);
    true
}

fn remove_building_entities(engine: &mut HeadlessEngine, building: &BuildingConfig) {
    engine.remove_entity(&marker_entity_id(&building.id));
    engine.remove_entity(&info_entity_id(&building.id));
    engine.remove_entity(&building.cylinder_entity_id());
}

fn summarize(engine: &HeadlessEngine, scenes: &SceneManager, interaction: &InteractionManager) {
    info!(
        scene = scenes.current_scene_id().unwrap_or("-"),
        tilesets = ?scenes.loaded_building_ids(),
        primitives = engine.primitives().len(),
        entities = engine.entities().len(),
        highlights = ?interaction.highlights().ids().collect::<Vec<_>>(),
        camera = ?engine.camera().position,
        "final state"
    );
}
