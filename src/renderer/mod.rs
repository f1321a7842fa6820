//! WebGPU rendering module
//!
//! Tessellates the scene draw list into vertex-colored triangles.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, field_to_ndc};
