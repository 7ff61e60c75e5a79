//! WebGPU rendering module
//!
//! `frame` turns game state into triangles in grid units; `pipeline` fits
//! them to the canvas and draws them.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::{build_frame, build_level_select};
pub use pipeline::RenderState;
pub use vertex::Vertex;
