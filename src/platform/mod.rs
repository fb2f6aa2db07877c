//! Platform frontends
//!
//! The browser build drives the game from `main.rs` (WebGPU + DOM HUD).
//! Native builds play in the terminal.

#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;
