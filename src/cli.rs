//! Command-line argument parsing.

use clap::Parser;

use crate::viz::VisualKind;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "micscope")]
#[command(about = "Live microphone visualizer", long_about = None)]
pub struct Args {
    /// Visual to render: waveform (oscilloscope) or bars (frequency)
    #[arg(long, value_name = "KIND", default_value = "waveform", value_parser = parse_visual)]
    pub visual: VisualKind,

    /// Initial window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,
}

fn parse_visual(value: &str) -> Result<VisualKind, String> {
    match value.to_lowercase().as_str() {
        "waveform" | "wave" | "scope" => Ok(VisualKind::Waveform),
        "bars" | "frequency" => Ok(VisualKind::Bars),
        other => Err(format!(
            "unknown visual '{other}' (expected 'waveform' or 'bars')"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_selection() {
        let args = Args::try_parse_from(["micscope", "--visual", "bars"]).unwrap();
        assert_eq!(args.visual, VisualKind::Bars);

        let args = Args::try_parse_from(["micscope"]).unwrap();
        assert_eq!(args.visual, VisualKind::Waveform);
    }

    #[test]
    fn test_unknown_visual_fails_parsing() {
        assert!(Args::try_parse_from(["micscope", "--visual", "plasma"]).is_err());
    }

    #[test]
    fn test_window_size_overrides() {
        let args =
            Args::try_parse_from(["micscope", "--width", "800", "--height", "600"]).unwrap();
        assert_eq!((args.width, args.height), (800, 600));
    }
}
