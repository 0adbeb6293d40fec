//! Core of the walking-guide client: the session context a UI component is
//! handed, the fixed live-session configuration, tool-call acknowledgement,
//! and the overlay component tying them together.

pub mod context;
pub mod overlay;
pub mod responder;
pub mod session_config;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{ConfigSetter, ConfigSlot, SessionContext};
pub use overlay::{GuideOverlay, OverlayProps, OverlayView, RenderMemo};
