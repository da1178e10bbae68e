pub mod camera;
pub mod core;
pub mod interaction;
pub mod loading;
pub mod scene;
