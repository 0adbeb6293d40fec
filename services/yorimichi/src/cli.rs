//! Command-line flags and terminal output for the overlay host.

use clap::Parser;
use yorimichi_core::{OverlayProps, OverlayView};

#[derive(Parser, Debug)]
#[command(version, about = "Walking guide on the Gemini Live API")]
pub struct Cli {
    /// Treat the camera feed as on, which hides the instruction overlay.
    #[arg(long)]
    pub video_on: bool,

    /// Render and mount the overlay without connecting to Gemini Live.
    #[arg(long)]
    pub offline: bool,

    /// Print the rendered overlay as JSON instead of plain lines.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn props(&self) -> OverlayProps {
        OverlayProps {
            is_video_on: self.video_on,
        }
    }
}

/// Plain-text rendering: the image's alt text, then each caption on its own line.
pub fn overlay_lines(view: &OverlayView) -> Vec<String> {
    std::iter::once(format!("[{}]", view.image.alt))
        .chain(view.captions.iter().map(|caption| caption.to_string()))
        .collect()
}
