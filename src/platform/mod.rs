//! Platform abstraction layer
//!
//! - `clock`: fixed-timestep accumulator (pure, runs anywhere)
//! - `frame_loop`: cancellable `requestAnimationFrame` loops (web only)

pub mod clock;
#[cfg(target_arch = "wasm32")]
pub mod frame_loop;

pub use clock::FixedStep;
#[cfg(target_arch = "wasm32")]
pub use frame_loop::FrameLoop;
