//! Analysis over the captured stream: a ring of recent samples plus
//! on-demand time-domain and frequency-domain snapshots.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};

use crate::params::AnalyzerConfig;

/// Fixed-capacity ring of the most recent mono samples.
///
/// The capture callback pushes, snapshot pulls copy; those are the only two
/// accessors, so a mutex around the ring is the entire cross-thread surface.
#[derive(Debug)]
pub struct SampleRing {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append samples, discarding the oldest once capacity is reached.
    pub fn push_slice(&mut self, samples: &[f32]) {
        for &sample in samples {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            self.samples.push_back(sample);
        }
    }

    /// Copy the most recent `out.len()` samples into `out`, oldest first.
    /// If fewer samples have arrived, the front of `out` is zero-filled.
    pub fn copy_latest(&self, out: &mut [f32]) {
        out.fill(0.0);
        let take = self.samples.len().min(out.len());
        let dst_start = out.len() - take;
        let src_skip = self.samples.len() - take;
        for (dst, src) in out[dst_start..]
            .iter_mut()
            .zip(self.samples.iter().skip(src_skip))
        {
            *dst = *src;
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Analysis stage observing the live stream without altering it.
///
/// Holds the most recent transform window of samples and exposes two
/// pull-style snapshots sized to the derived bin count: raw time-domain
/// amplitudes and byte-scaled frequency magnitudes. Constructed once per
/// session; the window size is fixed for its lifetime.
pub struct Analyzer {
    config: AnalyzerConfig,
    ring: Arc<Mutex<SampleRing>>,
    fft: Arc<dyn Fft<f32>>,
    /// Precomputed Hann window coefficients (one per window sample)
    window: Vec<f32>,
    window_samples: Vec<f32>,
    fft_scratch: Vec<Complex<f32>>,
    /// Magnitudes blended across snapshots by the smoothing constant
    smoothed: Vec<f32>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let fft_size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let window = (0..fft_size).map(|i| hann_window(i, fft_size)).collect();

        Ok(Self {
            ring: Arc::new(Mutex::new(SampleRing::new(fft_size))),
            fft,
            window,
            window_samples: vec![0.0; fft_size],
            fft_scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; config.bin_count()],
            config,
        })
    }

    /// Number of samples exposed per snapshot (half the window size).
    pub fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    /// Shared handle for the capture callback to push samples into.
    pub fn sample_sink(&self) -> Arc<Mutex<SampleRing>> {
        Arc::clone(&self.ring)
    }

    /// Copy the most recent `out.len()` time-domain samples (~-1.0..1.0)
    /// into the caller's buffer, most recent last.
    pub fn time_domain(&self, out: &mut [f32]) {
        self.ring.lock().unwrap().copy_latest(out);
    }

    /// Fill `out` with byte-scaled frequency magnitudes (0..255).
    ///
    /// Applies the Hann window over the current transform window, runs the
    /// forward FFT, smooths each bin magnitude against its previous value,
    /// and maps decibels linearly from the configured dB range onto 0..255,
    /// clamped. Silence maps to 0.
    pub fn byte_frequency(&mut self, out: &mut [u8]) {
        let fft_size = self.config.fft_size;

        self.ring
            .lock()
            .unwrap()
            .copy_latest(&mut self.window_samples);

        for i in 0..fft_size {
            self.fft_scratch[i] = Complex::new(self.window_samples[i] * self.window[i], 0.0);
        }
        self.fft.process(&mut self.fft_scratch);

        let retain = self.config.smoothing_time_constant;
        let db_span = self.config.max_decibels - self.config.min_decibels;
        let bins = out.len().min(self.smoothed.len());

        for k in 0..bins {
            let magnitude = self.fft_scratch[k].norm() / fft_size as f32;
            let smoothed = retain * self.smoothed[k] + (1.0 - retain) * magnitude;
            self.smoothed[k] = smoothed;

            let db = 20.0 * smoothed.log10();
            let scaled = (db - self.config.min_decibels) / db_span * 255.0;
            out[k] = scaled.clamp(0.0, 255.0) as u8;
        }
    }
}

/// Hann window function for the frequency transform
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_ring_discards_oldest_at_capacity() {
        let mut ring = SampleRing::new(4);
        ring.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(ring.len(), 4);

        let mut out = [0.0; 4];
        ring.copy_latest(&mut out);
        assert_eq!(out, [3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_ring_zero_fills_partial_window() {
        let ring = {
            let mut ring = SampleRing::new(8);
            ring.push_slice(&[1.0, 2.0]);
            ring
        };

        let mut out = [9.0; 5];
        ring.copy_latest(&mut out);
        assert_eq!(out, [0.0, 0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_time_domain_returns_latest_samples_in_order() {
        let analyzer = Analyzer::new(AnalyzerConfig::default()).unwrap();
        let samples: Vec<f32> = (0..3000).map(|n| n as f32).collect();
        analyzer.sample_sink().lock().unwrap().push_slice(&samples);

        let mut out = vec![0.0; analyzer.bin_count()];
        analyzer.time_domain(&mut out);

        assert_eq!(out.len(), 1024);
        assert_eq!(out[0], 1976.0);
        assert_eq!(out[1023], 2999.0);
    }

    #[test]
    fn test_silence_maps_to_zero_bytes() {
        let mut analyzer = Analyzer::new(AnalyzerConfig::default()).unwrap();
        let mut out = vec![0xff; analyzer.bin_count()];
        analyzer.byte_frequency(&mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sine_peaks_at_expected_bin() {
        let mut analyzer = Analyzer::new(AnalyzerConfig::default()).unwrap();
        let fft_size = analyzer.config.fft_size;
        let bin = 100;

        let tone: Vec<f32> = (0..fft_size)
            .map(|n| (TAU * bin as f32 * n as f32 / fft_size as f32).sin())
            .collect();
        analyzer.sample_sink().lock().unwrap().push_slice(&tone);

        let mut out = vec![0u8; analyzer.bin_count()];
        analyzer.byte_frequency(&mut out);

        assert_eq!(out[bin], 255);
        assert!(out[bin - 2] < 255);
        assert!(out[bin + 2] < 255);
    }

    #[test]
    fn test_hann_window_shape() {
        let size = 1024;

        // Zero at the edges, one at the center.
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }
}
