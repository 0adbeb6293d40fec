//! Named-event dispatch for a live session.
//!
//! Listeners register against an event name (e.g. `"toolcall"`) and are
//! removed with the `ListenerId` returned at registration.

use crate::types::{Content, ToolCall, ToolCallCancellation};
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicU64, Ordering},
};

pub const OPEN: &str = "open";
pub const CLOSE: &str = "close";
pub const SETUP_COMPLETE: &str = "setupcomplete";
pub const TOOL_CALL: &str = "toolcall";
pub const TOOL_CALL_CANCELLATION: &str = "toolcallcancellation";
pub const CONTENT: &str = "content";
pub const INTERRUPTED: &str = "interrupted";
pub const TURN_COMPLETE: &str = "turncomplete";

/// Events a live client emits to its listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    Open,
    Close,
    SetupComplete,
    ToolCall(ToolCall),
    ToolCallCancellation(ToolCallCancellation),
    Content(Content),
    Interrupted,
    TurnComplete,
}

impl LiveEvent {
    /// The name listeners subscribe to for this event.
    pub fn name(&self) -> &'static str {
        match self {
            LiveEvent::Open => OPEN,
            LiveEvent::Close => CLOSE,
            LiveEvent::SetupComplete => SETUP_COMPLETE,
            LiveEvent::ToolCall(_) => TOOL_CALL,
            LiveEvent::ToolCallCancellation(_) => TOOL_CALL_CANCELLATION,
            LiveEvent::Content(_) => CONTENT,
            LiveEvent::Interrupted => INTERRUPTED,
            LiveEvent::TurnComplete => TURN_COMPLETE,
        }
    }
}

pub type Listener = Arc<dyn Fn(&LiveEvent) + Send + Sync>;

/// Handle identifying one registration made with [`EventEmitter::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct EventEmitter {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<&'static str, Vec<(ListenerId, Listener)>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, event: &'static str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().entry(event).or_default().push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered under `event`.
    pub fn off(&self, event: &'static str, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let Some(registered) = listeners.get_mut(event) else {
            return false;
        };
        let before = registered.len();
        registered.retain(|(existing, _)| *existing != id);
        let removed = registered.len() != before;
        if registered.is_empty() {
            listeners.remove(event);
        }
        removed
    }

    /// Calls every listener registered for the event's name and returns how many ran.
    ///
    /// The registry lock is released before listeners run, so a listener may
    /// call `on`/`off` itself.
    pub fn emit(&self, event: &LiveEvent) -> usize {
        let snapshot: Vec<Listener> = self
            .lock()
            .get(event.name())
            .map(|registered| registered.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default();
        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.lock().get(event).map_or(0, Vec::len)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<&'static str, Vec<(ListenerId, Listener)>>> {
        // A panicking listener never runs under the lock, so the map is intact.
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_listener(counter: &Arc<AtomicUsize>) -> Listener {
        let counter = counter.clone();
        Arc::new(move |_: &LiveEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn emit_reaches_only_matching_listeners() {
        let emitter = EventEmitter::new();
        let tool_calls = Arc::new(AtomicUsize::new(0));
        let closes = Arc::new(AtomicUsize::new(0));
        emitter.on(TOOL_CALL, counting_listener(&tool_calls));
        emitter.on(CLOSE, counting_listener(&closes));

        let ran = emitter.emit(&LiveEvent::ToolCall(ToolCall::default()));

        assert_eq!(ran, 1);
        assert_eq!(tool_calls.load(Ordering::SeqCst), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn off_removes_only_the_given_registration() {
        let emitter = EventEmitter::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let first = emitter.on(TOOL_CALL, counting_listener(&counter));
        emitter.on(TOOL_CALL, counting_listener(&counter));

        assert!(emitter.off(TOOL_CALL, first));
        assert!(!emitter.off(TOOL_CALL, first));
        assert!(!emitter.off(CLOSE, first));
        assert_eq!(emitter.listener_count(TOOL_CALL), 1);

        emitter.emit(&LiveEvent::ToolCall(ToolCall::default()));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_can_detach_itself_during_emit() {
        let emitter = Arc::new(EventEmitter::new());
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let listener: Listener = {
            let emitter = emitter.clone();
            let slot = slot.clone();
            Arc::new(move |_: &LiveEvent| {
                if let Some(id) = slot.lock().unwrap().take() {
                    emitter.off(TOOL_CALL, id);
                }
            })
        };
        let id = emitter.on(TOOL_CALL, listener);
        *slot.lock().unwrap() = Some(id);

        assert_eq!(emitter.emit(&LiveEvent::ToolCall(ToolCall::default())), 1);
        assert_eq!(emitter.listener_count(TOOL_CALL), 0);
        assert_eq!(emitter.emit(&LiveEvent::ToolCall(ToolCall::default())), 0);
    }

    #[test]
    fn event_names_are_stable() {
        assert_eq!(LiveEvent::ToolCall(ToolCall::default()).name(), "toolcall");
        assert_eq!(LiveEvent::TurnComplete.name(), "turncomplete");
    }
}
