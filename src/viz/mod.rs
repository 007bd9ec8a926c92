//! Frame visuals: map analysis snapshots to 2D geometry in pixel space.
//!
//! The two draw variants are one capability with two implementations,
//! chosen by configuration at startup. Surface clearing, the pixel-to-clip
//! transform, and frame rescheduling are shared render-system boilerplate;
//! each visual only turns its snapshot buffer into colored vertices once
//! per display frame.

use bytemuck::{Pod, Zeroable};

use crate::audio::Analyzer;
use crate::params::ScreenSize;

pub mod bars;
pub mod waveform;

pub use bars::BarsVisual;
pub use waveform::WaveformVisual;

/// Which visualization to run for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    /// Time-domain oscilloscope polyline
    Waveform,
    /// Frequency-domain bar graph
    Bars,
}

impl std::fmt::Display for VisualKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualKind::Waveform => write!(f, "waveform"),
            VisualKind::Bars => write!(f, "bars"),
        }
    }
}

/// Vertex data shared by both visual pipelines (pixel-space position + color)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// How the render system interprets a visual's vertex stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Connected line strip
    Polyline,
    /// Independent filled triangles
    Triangles,
}

/// A per-frame visual.
///
/// Owns its reusable snapshot buffer (length equals the analyzer's bin
/// count for the whole session, overwritten in place every frame) and its
/// vertex scratch.
pub trait Visual {
    /// Vertex interpretation for this visual's geometry.
    fn topology(&self) -> Topology;

    /// Pull the latest analysis snapshot and rebuild this frame's geometry.
    fn update(&mut self, analyzer: &mut Analyzer, size: ScreenSize) -> &[Vertex];
}

/// Construct the configured visual with buffers sized to the analyzer's
/// bin count.
pub fn create(kind: VisualKind, bin_count: usize) -> Box<dyn Visual> {
    match kind {
        VisualKind::Waveform => Box::new(WaveformVisual::new(bin_count)),
        VisualKind::Bars => Box::new(BarsVisual::new(bin_count)),
    }
}
