//! The walking-guide overlay shown over the camera area.
//!
//! Mounting registers the guide's session config and starts acknowledging
//! tool calls. Rendering is a pure function of [`OverlayProps`]: nothing while
//! video is on, otherwise a fixed icon with three instruction captions.

use crate::{
    context::{ConfigSetter, SessionContext, same_instance},
    responder::ToolCallSubscription,
    session_config::guide_config,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const CAPTIONS: [&str; 3] = [
    "1.再生ボタンをONにする",
    "2.マイクとカメラをONにする",
    "3.何が見えますか？と話しかける",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayProps {
    pub is_video_on: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageElement {
    pub src: &'static str,
    pub alt: &'static str,
    pub class_name: &'static str,
}

/// What the overlay draws: one icon followed by the captions, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayView {
    pub class_name: &'static str,
    pub image: ImageElement,
    pub caption_class: &'static str,
    pub captions: [&'static str; 3],
}

/// Lifecycle state of one overlay instance.
///
/// Holds at most one tool-call subscription. Dropping the overlay releases it
/// the same way [`GuideOverlay::unmount`] does.
#[derive(Default)]
pub struct GuideOverlay {
    config_target: Option<Arc<dyn ConfigSetter>>,
    subscription: Option<ToolCallSubscription>,
}

impl GuideOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates the overlay against `ctx`, or re-syncs it after the context changed.
    ///
    /// The config is registered when the setter is new to this instance, and
    /// the tool-call listener is (re)attached when the client is. Repeating the
    /// call with the same handles does nothing.
    pub fn mount(&mut self, ctx: &SessionContext) {
        let setter_changed = self
            .config_target
            .as_ref()
            .is_none_or(|current| !same_instance(current, &ctx.config));
        if setter_changed {
            ctx.config.set_config(guide_config());
            self.config_target = Some(ctx.config.clone());
            info!("Registered walking-guide session config.");
        }

        let client_changed = self
            .subscription
            .as_ref()
            .is_none_or(|current| !same_instance(current.client(), &ctx.client));
        if client_changed {
            // Release the old listener before attaching a new one.
            if self.subscription.take().is_some() {
                debug!("Live client changed; re-subscribing to tool calls.");
            }
            self.subscription = Some(ToolCallSubscription::subscribe(ctx.client.clone()));
        }
    }

    /// Detaches from the session. Pending tool responses are cancelled.
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            debug!("Overlay unmounted; tool-call listener detached.");
        }
        self.config_target = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn render(props: OverlayProps) -> Option<OverlayView> {
        if props.is_video_on {
            return None;
        }
        Some(OverlayView {
            class_name: "yorimichi-overlay",
            image: ImageElement {
                src: "Yorimichi.png",
                alt: "Yorimichi Icon",
                class_name: "yorimichi-image",
            },
            caption_class: "yorimichi-text",
            captions: CAPTIONS,
        })
    }
}

/// Skips [`GuideOverlay::render`] when the props equal the previous call's.
#[derive(Default)]
pub struct RenderMemo {
    last: Option<(OverlayProps, Option<OverlayView>)>,
    renders: usize,
}

impl RenderMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, props: OverlayProps) -> Option<&OverlayView> {
        let stale = self.last.as_ref().is_none_or(|(last, _)| *last != props);
        if stale {
            self.renders += 1;
            self.last = Some((props, GuideOverlay::render(props)));
        }
        self.last.as_ref().and_then(|(_, view)| view.as_ref())
    }

    /// How many times the underlying render actually ran.
    pub fn render_count(&self) -> usize {
        self.renders
    }
}
