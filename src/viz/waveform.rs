//! Time-domain oscilloscope visual.

use super::{Topology, Vertex, Visual};
use crate::audio::Analyzer;
use crate::params::ScreenSize;

/// Stroke color for the waveform polyline
const LINE_COLOR: [f32; 4] = [0.6, 0.8, 0.9, 1.0];

/// Oscilloscope polyline over the latest time-domain snapshot.
pub struct WaveformVisual {
    samples: Vec<f32>,
    vertices: Vec<Vertex>,
}

impl WaveformVisual {
    /// Create a waveform visual with its sample buffer sized to `bin_count`.
    pub fn new(bin_count: usize) -> Self {
        Self {
            samples: vec![0.0; bin_count],
            vertices: Vec::with_capacity(bin_count + 1),
        }
    }
}

impl Visual for WaveformVisual {
    fn topology(&self) -> Topology {
        Topology::Polyline
    }

    fn update(&mut self, analyzer: &mut Analyzer, size: ScreenSize) -> &[Vertex] {
        analyzer.time_domain(&mut self.samples);
        build_polyline(
            &self.samples,
            size.width as f32,
            size.height as f32,
            &mut self.vertices,
        );
        &self.vertices
    }
}

/// Build the oscilloscope polyline.
///
/// Sample `i` sits at `x = i * width / n`; its value is scaled to half the
/// surface height and re-centered at mid-height. The path terminates with
/// an explicit closing point at the right-edge midline `(width, height/2)`.
pub fn build_polyline(samples: &[f32], width: f32, height: f32, out: &mut Vec<Vertex>) {
    out.clear();
    if samples.is_empty() {
        return;
    }

    let step = width / samples.len() as f32;
    let mid = height / 2.0;

    for (i, &sample) in samples.iter().enumerate() {
        let x = i as f32 * step;
        let y = mid + sample.clamp(-1.0, 1.0) * mid;
        out.push(Vertex {
            position: [x, y],
            color: LINE_COLOR,
        });
    }

    out.push(Vertex {
        position: [width, mid],
        color: LINE_COLOR,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn xs(vertices: &[Vertex]) -> Vec<f32> {
        vertices.iter().map(|v| v.position[0]).collect()
    }

    #[test]
    fn test_horizontal_step_is_width_over_bins() {
        let samples = vec![0.0; 1024];
        let mut out = Vec::new();
        build_polyline(&samples, 800.0, 600.0, &mut out);

        // 1024 interior points plus one closing point.
        assert_eq!(out.len(), 1025);

        let step = 800.0 / 1024.0;
        assert_eq!(step, 0.78125);
        for (i, &x) in xs(&out[..1024]).iter().enumerate() {
            assert_eq!(x, i as f32 * step);
        }

        assert_eq!(out[0].position[0], 0.0);
        assert_relative_eq!(out[1023].position[0], 799.21875);
    }

    #[test]
    fn test_closing_point_at_right_edge_midline() {
        let samples = vec![0.5; 16];
        let mut out = Vec::new();
        build_polyline(&samples, 640.0, 480.0, &mut out);

        let closing = out.last().unwrap();
        assert_eq!(closing.position, [640.0, 240.0]);
    }

    #[test]
    fn test_sample_to_y_mapping() {
        let samples = vec![-1.0, -0.5, 0.0, 0.5, 1.0];
        let mut out = Vec::new();
        build_polyline(&samples, 500.0, 600.0, &mut out);

        // y = height/2 + v * height/2
        let ys: Vec<f32> = out[..5].iter().map(|v| v.position[1]).collect();
        assert_eq!(ys, vec![0.0, 150.0, 300.0, 450.0, 600.0]);
    }

    #[test]
    fn test_y_confined_to_surface_for_legal_samples() {
        let height = 480.0;
        let samples: Vec<f32> = (0..=200).map(|i| i as f32 / 100.0 - 1.0).collect();
        let mut out = Vec::new();
        build_polyline(&samples, 640.0, height, &mut out);

        for vertex in &out {
            assert!(vertex.position[1] >= 0.0);
            assert!(vertex.position[1] <= height);
        }
    }

    #[test]
    fn test_empty_snapshot_builds_no_geometry() {
        let mut out = Vec::new();
        build_polyline(&[], 640.0, 480.0, &mut out);
        assert!(out.is_empty());
    }
}
