//! Audio capture and analysis.
//!
//! The capture side runs on the host's audio thread and shares exactly one
//! structure with the rest of the system: the analyzer's sample ring.

pub mod analyzer;
pub mod capture;

pub use analyzer::{Analyzer, SampleRing};
pub use capture::CaptureStream;
