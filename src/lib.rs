//! retro-pc
//!
//! A retro personal computer (monitor, stand, keyboard) assembled from box and
//! plane primitives, gently swinging about its vertical axis while a looping
//! video plays on its screen. Runs natively and in the browser (WebGL through
//! wgpu).
//!
//! High-level modules
//! - `catalog`: static part tables per model variant
//! - `assembler`: validates a catalog and builds the composite object
//! - `driver`: per-frame oscillation, the resize contract and the render
//!   surface seam
//! - `media`: the screen's media source, frame feed and texture
//! - `camera`: view and projection
//! - `config`: viewer settings from defaults, URL queries or the environment
//! - `context`: window and GPU plumbing
//! - `data_structures`: instances, meshes, materials, textures and the
//!   composite scene graph
//! - `pipelines`: the part pipeline and its lights
//! - `render`: GPU upload and frame recording
//! - `resources`: primitive geometry and local asset loading
//! - `flow`: the winit event loop
//!

pub mod assembler;
pub mod camera;
pub mod catalog;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod driver;
pub mod error;
pub mod flow;
pub mod media;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use assembler::assemble;
pub use catalog::{PartDescriptor, Variant};
pub use config::ViewerConfig;
pub use driver::{FrameDriver, RenderSurface, Stage, Viewer};
pub use error::{AssetLoadFailure, MalformedDescriptor};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point. Settings come from the page's query string.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let query = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    let config = ViewerConfig::from_query(&query).map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    flow::run(config).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
