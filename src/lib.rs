//! termpix - render raster images as colored text in a character terminal
//!
//! This library exports the render pipeline and its collaborators for
//! testing and reuse; the `termpix` binary is a thin CLI on top.

pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod source;
pub mod terminal;

pub use error::RenderError;
