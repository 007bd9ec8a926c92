//! Frequency-domain bar-graph visual.

use super::{Topology, Vertex, Visual};
use crate::audio::Analyzer;
use crate::params::ScreenSize;

/// Horizontal gap between adjacent bars (pixels)
const BAR_GAP: f32 = 1.0;

/// Width multiplier applied to the per-bin share of the surface width
const BAR_WIDTH_SCALE: f32 = 2.5;

/// Filled bar graph over the latest frequency-magnitude snapshot.
pub struct BarsVisual {
    magnitudes: Vec<u8>,
    vertices: Vec<Vertex>,
}

impl BarsVisual {
    /// Create a bars visual with its magnitude buffer sized to `bin_count`.
    pub fn new(bin_count: usize) -> Self {
        Self {
            magnitudes: vec![0; bin_count],
            vertices: Vec::with_capacity(bin_count * 6),
        }
    }
}

impl Visual for BarsVisual {
    fn topology(&self) -> Topology {
        Topology::Triangles
    }

    fn update(&mut self, analyzer: &mut Analyzer, size: ScreenSize) -> &[Vertex] {
        analyzer.byte_frequency(&mut self.magnitudes);
        build_bars(
            &self.magnitudes,
            size.width as f32,
            size.height as f32,
            &mut self.vertices,
        );
        &self.vertices
    }
}

/// Per-bar fill color: sine, cosine, and tangent of the magnitude, each
/// scaled to a 0-255 channel and clamped to the representable range.
///
/// Tangent blows up near its asymptotes, so the blue channel saturates or
/// collapses at those magnitudes; the clamp only keeps the channel
/// representable without moving where the discontinuities land.
pub fn bar_color(magnitude: u8) -> [u8; 3] {
    let m = magnitude as f32;
    [channel(m.sin()), channel(m.cos()), channel(m.tan())]
}

fn channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Build one filled rectangle per bin.
///
/// Bar height equals the byte magnitude in pixels, anchored to the bottom
/// edge; x advances by the bar width `(width / n) * 2.5` plus one pixel of
/// spacing per bar. Bars running past the right edge are clipped by the
/// surface.
pub fn build_bars(magnitudes: &[u8], width: f32, height: f32, out: &mut Vec<Vertex>) {
    out.clear();
    if magnitudes.is_empty() {
        return;
    }

    let bar_width = width / magnitudes.len() as f32 * BAR_WIDTH_SCALE;
    let mut x = 0.0;

    for &magnitude in magnitudes {
        let [r, g, b] = bar_color(magnitude);
        let color = [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        ];
        let bar_height = magnitude as f32;

        push_rect(out, x, height - bar_height, bar_width, bar_height, color);
        x += bar_width + BAR_GAP;
    }
}

fn push_rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    let (x0, y0, x1, y1) = (x, y, x + w, y + h);
    out.extend_from_slice(&[
        Vertex {
            position: [x0, y0],
            color,
        },
        Vertex {
            position: [x0, y1],
            color,
        },
        Vertex {
            position: [x1, y0],
            color,
        },
        Vertex {
            position: [x1, y0],
            color,
        },
        Vertex {
            position: [x0, y1],
            color,
        },
        Vertex {
            position: [x1, y1],
            color,
        },
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trig_color_mapping() {
        // m = 0: sin 0, cos 1, tan 0
        assert_eq!(bar_color(0), [0, 255, 0]);

        // m = 1 rad: sin 0.8415 -> 215, cos 0.5403 -> 138, tan 1.557 -> clamped
        assert_eq!(bar_color(1), [215, 138, 255]);

        // m = 2 rad: sin 0.9093 -> 232, cos and tan negative -> clamped to 0
        assert_eq!(bar_color(2), [232, 0, 0]);
    }

    #[test]
    fn test_channels_always_representable() {
        for m in 0..=255u8 {
            // clamp guarantees every channel lands in 0..=255; evaluating the
            // whole range also exercises tangent near its asymptotes.
            let _ = bar_color(m);
        }
        assert_eq!(channel(-0.5), 0);
        assert_eq!(channel(2.0), 255);
    }

    #[test]
    fn test_bar_advance_is_width_plus_gap() {
        let magnitudes = vec![10, 20, 30, 40];
        let mut out = Vec::new();
        build_bars(&magnitudes, 8.0, 600.0, &mut out);

        // bar width = 8 / 4 * 2.5 = 5, advance = 6 per bar
        assert_eq!(out.len(), 4 * 6);
        for (i, quad) in out.chunks(6).enumerate() {
            let left = i as f32 * 6.0;
            assert_eq!(quad[0].position[0], left);
            assert_eq!(quad[5].position[0], left + 5.0);
        }
    }

    #[test]
    fn test_bar_height_equals_magnitude() {
        let magnitudes = vec![100];
        let mut out = Vec::new();
        build_bars(&magnitudes, 640.0, 600.0, &mut out);

        // Anchored to the bottom edge, extending magnitude pixels upward.
        assert_eq!(out[0].position[1], 500.0);
        assert_eq!(out[5].position[1], 600.0);
    }

    #[test]
    fn test_empty_snapshot_builds_no_geometry() {
        let mut out = Vec::new();
        build_bars(&[], 640.0, 480.0, &mut out);
        assert!(out.is_empty());
    }
}
