pub mod generation;
pub mod input;
pub mod logging;

pub use generation::*;
pub use input::*;
pub use logging::*;
