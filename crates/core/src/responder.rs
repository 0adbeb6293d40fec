//! Acknowledges tool calls from the live session.
//!
//! Every function call is answered with a fixed success payload after a short
//! delay. Nothing here looks at the call's name or arguments.

use gemini_realtime::{
    LiveClient, Listener, ListenerId, LiveEvent,
    events::TOOL_CALL,
    types::{FunctionResponse, ToolCall, ToolResponse},
};
use std::{sync::Arc, time::Duration};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const TOOL_RESPONSE_DELAY: Duration = Duration::from_millis(200);

/// Builds the success response for a tool call, or `None` if it carries no calls.
pub fn acknowledge(call: &ToolCall) -> Option<ToolResponse> {
    if call.function_calls.is_empty() {
        return None;
    }
    Some(ToolResponse {
        function_responses: call
            .function_calls
            .iter()
            .map(|fc| FunctionResponse::success(fc.id.clone()))
            .collect(),
    })
}

/// A `"toolcall"` listener registered on a live client for as long as this value lives.
///
/// Dropping it detaches the listener and cancels responses still waiting out
/// their delay. Delayed sends run on the runtime captured at subscription, so
/// events may be emitted from any thread.
pub struct ToolCallSubscription {
    client: Arc<dyn LiveClient>,
    listener_id: ListenerId,
    cancel: CancellationToken,
}

impl ToolCallSubscription {
    /// Subscribes using the Tokio runtime the caller is running on, if any.
    pub fn subscribe(client: Arc<dyn LiveClient>) -> Self {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            warn!("No Tokio runtime at subscription; tool calls will not be answered.");
        }
        Self::subscribe_with(client, runtime)
    }

    /// Subscribes with delayed sends spawned onto `runtime`. Without one, tool
    /// calls are logged and left unanswered.
    pub fn subscribe_with(client: Arc<dyn LiveClient>, runtime: Option<Handle>) -> Self {
        let cancel = CancellationToken::new();
        let listener: Listener = {
            // Weak: the client owns the listener.
            let weak_client = Arc::downgrade(&client);
            let cancel = cancel.clone();
            Arc::new(move |event: &LiveEvent| {
                let LiveEvent::ToolCall(call) = event else {
                    return;
                };
                debug!(?call, "got toolcall");
                let Some(response) = acknowledge(call) else {
                    return;
                };
                let Some(runtime) = &runtime else {
                    warn!(
                        count = response.function_responses.len(),
                        "No Tokio runtime; dropping tool response."
                    );
                    return;
                };
                let weak_client = weak_client.clone();
                let cancel = cancel.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            debug!("Subscription released; dropping pending tool response.");
                        }
                        _ = tokio::time::sleep(TOOL_RESPONSE_DELAY) => {
                            if let Some(client) = weak_client.upgrade() {
                                client.send_tool_response(response);
                            }
                        }
                    }
                });
            })
        };
        let listener_id = client.on(TOOL_CALL, listener);
        Self {
            client,
            listener_id,
            cancel,
        }
    }

    pub fn client(&self) -> &Arc<dyn LiveClient> {
        &self.client
    }
}

impl Drop for ToolCallSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.client.off(TOOL_CALL, self.listener_id);
    }
}
