//! Rendering module
//!
//! `scene` builds a triangle list from the simulation (pure, testable);
//! `pipeline` presents it with WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::{SceneOptions, build_scene};
pub use vertex::Vertex;
