//! Rendering module
//!
//! [`scene`] builds a triangle list from the game state on any target;
//! [`pipeline`] presents it through WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{DrawList, build_scene, clear_color};
pub use vertex::{Vertex, colors};
