//! Live microphone visualizer: oscilloscope waveform or frequency bars on a
//! full-window drawing surface.

pub mod audio;
pub mod cli;
pub mod params;
pub mod rendering;
pub mod telemetry;
pub mod viz;
