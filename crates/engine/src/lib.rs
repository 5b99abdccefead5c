//! Rendering-engine seam: primitives, entities, camera and picking behind one trait.

pub mod camera;
pub mod error;
pub mod headless;
pub mod loader;
pub mod primitives;
pub mod render;

pub use camera::{Camera, Viewport};
pub use error::{EngineError, LoadError};
pub use headless::HeadlessEngine;
pub use loader::{BoxFuture, FileTilesetLoader, MemoryTilesetLoader, TilesetLoader};
pub use primitives::*;
pub use render::{PickedObject, RenderEngine};
