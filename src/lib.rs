//! Full-viewport animated snowfall overlay rendered with WebGL.
//!
//! The crate exports [`SnowfallOverlay`] (wasm only), a component bound to a
//! host element that attaches a style-isolated canvas covering the viewport,
//! drives a shader pipeline from `requestAnimationFrame`, and tears every
//! DOM and GPU resource down again on detach. Pointer input passes through to
//! the page underneath.
//!
//! Pure modules (shader assembly, geometry, DPR resolution, the frame-loop
//! state machine, the error taxonomy) compile on every target so their tests
//! run off-browser; everything touching the DOM or GL is wasm32-only.

pub mod dpr;
pub mod error;
pub mod geometry;
pub mod phase;
pub mod shaders;

#[cfg(target_arch = "wasm32")]
mod component;
#[cfg(target_arch = "wasm32")]
mod pipeline;
#[cfg(target_arch = "wasm32")]
mod scheduler;
#[cfg(target_arch = "wasm32")]
mod surface;

#[cfg(target_arch = "wasm32")]
pub use component::SnowfallOverlay;
pub use error::{RenderError, ShaderStage};
pub use phase::FramePhase;
pub use shaders::ShaderSource;

#[cfg(target_arch = "wasm32")]
mod boot {
    use wasm_bindgen::prelude::*;
    use web_sys::console;

    #[wasm_bindgen(start)]
    pub fn main() {
        console::log_1(&format!("[snowfall-overlay] loaded v{}", version()).into());
    }

    #[wasm_bindgen]
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").into()
    }
}
