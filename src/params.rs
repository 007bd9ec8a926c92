//! Parameter definitions with documented semantics.
//!
//! All fixed quantities of the analysis and render pipelines live here with
//! documented ranges and meanings, plus the shared screen-size state read by
//! every draw pass.

/// Audio analyzer configuration.
///
/// Mirrors the fixed analysis graph: a 2048-sample transform window whose
/// derived bin count (half the window) sizes every per-frame snapshot buffer
/// for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Transform window size in samples (must be a power of 2)
    pub fft_size: usize,

    /// Blend factor for magnitude smoothing across snapshots (0.0..1.0,
    /// fraction of the previous smoothed value retained)
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to byte value 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte value 255 (dBFS)
    pub max_decibels: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyzerConfig {
    /// Number of frequency bins exposed per snapshot (half the window size).
    ///
    /// Time-domain and frequency-domain snapshot buffers are both sized to
    /// this count.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (window size must be a power of 2, etc.)
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.fft_size.is_power_of_two() {
            anyhow::bail!(
                "transform window size must be a power of 2, got {}",
                self.fft_size
            );
        }
        if self.fft_size < 2 {
            anyhow::bail!("transform window size must be at least 2");
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            anyhow::bail!(
                "smoothing time constant must be in [0, 1), got {}",
                self.smoothing_time_constant
            );
        }
        if self.min_decibels >= self.max_decibels {
            anyhow::bail!(
                "min decibels ({}) must be below max decibels ({})",
                self.min_decibels,
                self.max_decibels
            );
        }
        Ok(())
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Initial window width (pixels)
    pub window_width: u32,

    /// Initial window height (pixels)
    pub window_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Current drawing-surface dimensions in pixels.
///
/// Created at startup with zero values, set when the window is created, and
/// updated by the resize handler for the process lifetime. Mutated only on
/// the event-loop thread; every draw pass reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    /// Recompute the shared state from new viewport dimensions.
    ///
    /// Zero-sized dimensions (minimized window) are ignored so the surface
    /// is never configured to an invalid extent.
    pub fn update(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_count_is_half_window() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.fft_size, 2048);
        assert_eq!(config.bin_count(), 1024);
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut config = AnalyzerConfig {
            fft_size: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.fft_size = 2048;
        config.smoothing_time_constant = 1.0;
        assert!(config.validate().is_err());

        config.smoothing_time_constant = 0.8;
        config.min_decibels = -30.0;
        config.max_decibels = -100.0;
        assert!(config.validate().is_err());

        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_screen_size_update_is_idempotent() {
        let mut size = ScreenSize::default();
        assert_eq!(size, ScreenSize { width: 0, height: 0 });

        size.update(800, 600);
        let first = size;
        size.update(800, 600);
        assert_eq!(size, first);
    }

    #[test]
    fn test_screen_size_ignores_zero_dimensions() {
        let mut size = ScreenSize::default();
        size.update(1280, 720);
        size.update(0, 720);
        size.update(1280, 0);
        assert_eq!(
            size,
            ScreenSize {
                width: 1280,
                height: 720
            }
        );
    }
}
