//! Rendering module
//!
//! - `scene`: cosmetic state (clouds, particles, flash) driven by game events
//! - `sdf_pipeline`: WebGPU pipeline, everything drawn with SDFs in the
//!   fragment shader

pub mod scene;
pub mod sdf_pipeline;

pub use scene::{Cloud, Particle, Scene};
pub use sdf_pipeline::{RendererError, SdfRenderState};
