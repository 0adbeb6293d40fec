use gemini_realtime::{
    EventEmitter, LiveClient, Listener, ListenerId, LiveEvent,
    events::TOOL_CALL,
    types::{FunctionCall, ToolCall, ToolResponse},
};
use std::sync::Mutex;

/// In-memory live client that records every tool response it is asked to send.
#[derive(Default)]
pub(crate) struct FakeClient {
    emitter: EventEmitter,
    responses: Mutex<Vec<ToolResponse>>,
}

impl FakeClient {
    pub(crate) fn fire(&self, call: ToolCall) -> usize {
        self.emitter.emit(&LiveEvent::ToolCall(call))
    }

    pub(crate) fn responses(&self) -> Vec<ToolResponse> {
        self.responses.lock().unwrap().clone()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.emitter.listener_count(TOOL_CALL)
    }
}

impl LiveClient for FakeClient {
    fn on(&self, event: &'static str, listener: Listener) -> ListenerId {
        self.emitter.on(event, listener)
    }

    fn off(&self, event: &'static str, id: ListenerId) {
        self.emitter.off(event, id);
    }

    fn send_tool_response(&self, response: ToolResponse) {
        self.responses.lock().unwrap().push(response);
    }
}

pub(crate) fn tool_call(ids: &[&str]) -> ToolCall {
    ToolCall {
        function_calls: ids
            .iter()
            .map(|id| FunctionCall {
                id: id.to_string(),
                name: "render_graph".to_string(),
                args: serde_json::json!({ "json_graph": "{}" }),
            })
            .collect(),
    }
}
