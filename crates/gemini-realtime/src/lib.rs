//! Client-side plumbing for the Gemini Multimodal Live API: wire types, a
//! named-event emitter, and a WebSocket client that ties them together.

pub mod client;
pub mod events;
pub mod types;

pub use client::{DEFAULT_LIVE_URL, GeminiLiveClient, LiveClient};
pub use events::{EventEmitter, Listener, ListenerId, LiveEvent};
