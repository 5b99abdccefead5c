pub mod ecef;
pub mod geodesy;
pub mod local;
pub mod matrix;
pub mod orientation;
pub mod placement;
pub mod precision;
pub mod vec;

pub use ecef::*;
pub use geodesy::*;
pub use local::*;
pub use matrix::*;
pub use orientation::*;
pub use placement::*;
pub use precision::*;
pub use vec::*;
