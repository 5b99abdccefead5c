//! Campus viewer: building and floor highlights, scene switching and pointer interaction.
//!
//! Managers hold viewer state only. The engine and tileset loader are passed into each
//! call, so the same managers drive the headless engine in tests and the native app.

pub mod building;
pub mod debug;
pub mod highlight;
pub mod interaction;
pub mod model_info;
pub mod monomerization;
pub mod scenes;

pub use building::BuildingManager;
pub use highlight::{HighlightManager, MonomerizationResult};
pub use interaction::{ClickOutcome, InteractionManager};
pub use model_info::ModelInfo;
pub use monomerization::ConfigOptions;
pub use scenes::SceneManager;
