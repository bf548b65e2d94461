//! Debug module for visualizing collision volumes
//!
//! Simple line-list factories; nothing here affects collision behavior.

pub mod wireframe;

pub use wireframe::WireframeMesh;
