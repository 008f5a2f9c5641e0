pub mod components;
pub mod engine;
pub mod entity;
pub mod headless;
pub mod picking;
pub mod world;

pub use engine::SceneEngine;
pub use headless::HeadlessScene;
pub use world::*;
