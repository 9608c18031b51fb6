//! Rendering module
//!
//! `scene` turns a session into backend-agnostic draw commands; `canvas`
//! replays them on a Canvas 2D context in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod commands;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use commands::{Align, Color, DrawCommand};
pub use scene::{SceneOptions, scene, scene_with};
