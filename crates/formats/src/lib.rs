pub mod builtin;
pub mod catalog;
pub mod config;
pub mod monomerization;
pub mod tileset;

pub use catalog::*;
pub use config::*;
pub use monomerization::*;
pub use tileset::*;
