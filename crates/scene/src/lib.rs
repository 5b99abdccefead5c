pub mod components;
pub mod entity;
pub mod payload;
pub mod picking;
pub mod world;

pub use world::*;
