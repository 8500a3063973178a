//! Contract between the scene and whatever rasterizes it.

use thiserror::Error;

use crate::curve::{CurveMode, DrawGeometry};

/// Primitive topology for one draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    /// Connected line strip through the evaluated samples.
    LineStrip,
    /// One decorative glyph per evaluated sample.
    Points,
}

/// Failures a backend reports per draw call. The scene logs these and skips
/// the call for the current frame; they never abort the tick loop.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no pipeline for curve mode {0:?}")]
    Pipeline(CurveMode),
    #[error("sample count {requested} exceeds draw capacity {capacity}")]
    Capacity { requested: u32, capacity: u32 },
}

/// Rasterizer the scene dispatches to once per curve per topology.
///
/// Implementations receive a read-only geometry snapshot and must not retain
/// it past the call.
pub trait RenderBackend {
    fn draw(&mut self, geometry: &DrawGeometry, topology: Topology) -> Result<(), BackendError>;
}
