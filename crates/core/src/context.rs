//! The live session context injected into UI components.

use gemini_realtime::{LiveClient, types::LiveConfig};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Accepts the session configuration a component wants the live session to use.
///
/// Fire-and-forget: when and how the configuration takes effect is up to the
/// owner of the session.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSetter: Send + Sync {
    fn set_config(&self, config: LiveConfig);
}

/// Holds the most recently registered configuration until the host connects.
#[derive(Default)]
pub struct ConfigSlot {
    current: Mutex<Option<LiveConfig>>,
}

impl ConfigSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<LiveConfig> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ConfigSetter for ConfigSlot {
    fn set_config(&self, config: LiveConfig) {
        debug!(model = %config.model, "Session config registered");
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(config);
    }
}

/// Shared capabilities of a live session: its event client and its config setter.
///
/// Both are owned elsewhere; components only borrow them through these handles.
#[derive(Clone)]
pub struct SessionContext {
    pub client: Arc<dyn LiveClient>,
    pub config: Arc<dyn ConfigSetter>,
}

impl SessionContext {
    pub fn new(client: Arc<dyn LiveClient>, config: Arc<dyn ConfigSetter>) -> Self {
        Self { client, config }
    }
}

/// Identity comparison for shared handles, ignoring trait-object metadata.
pub(crate) fn same_instance<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
