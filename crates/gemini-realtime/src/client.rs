//! WebSocket client for the Gemini Multimodal Live API.

use crate::{
    events::{EventEmitter, ListenerId, Listener, LiveEvent},
    types::{ClientMessage, LiveConfig, ServerMessage, ToolResponse},
};
use anyhow::{Context, Result};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message as WsMessage,
};
use tracing::{debug, error, info, warn};

pub const DEFAULT_LIVE_URL: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent";

type LiveSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The surface a UI component needs from a live session: event subscription
/// and the tool-response action. Failures are handled inside the client.
pub trait LiveClient: Send + Sync {
    fn on(&self, event: &'static str, listener: Listener) -> ListenerId;
    fn off(&self, event: &'static str, id: ListenerId);
    fn send_tool_response(&self, response: ToolResponse);
}

struct Connection {
    outbound: mpsc::UnboundedSender<ClientMessage>,
    task: JoinHandle<()>,
}

pub struct GeminiLiveClient {
    url: String,
    emitter: Arc<EventEmitter>,
    connection: Mutex<Option<Connection>>,
}

impl GeminiLiveClient {
    /// Creates a disconnected client. `url` must already carry the API key query parameter.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            emitter: Arc::new(EventEmitter::new()),
            connection: Mutex::new(None),
        }
    }

    /// Builds the endpoint URL for an API key.
    pub fn endpoint(base_url: &str, api_key: &str) -> String {
        format!("{}?key={}", base_url, api_key)
    }

    pub fn is_connected(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|conn| !conn.task.is_finished())
    }

    /// Opens the socket, sends `setup` with `config`, and starts the I/O task.
    ///
    /// An existing connection is torn down first.
    pub async fn connect(&self, config: LiveConfig) -> Result<()> {
        self.disconnect();

        let (ws_stream, _) = connect_async(self.url.as_str())
            .await
            .context("Failed to connect to Gemini Live WebSocket")?;
        info!(model = %config.model, "Connected to Gemini Live WebSocket.");
        let (mut sink, stream) = ws_stream.split();

        let setup = serde_json::to_string(&ClientMessage::Setup(config))?;
        sink.send(WsMessage::Text(setup.into()))
            .await
            .context("Failed to send setup message")?;

        // Listeners see `Open` before any frame the reader task dispatches.
        self.emitter.emit(&LiveEvent::Open);

        let (outbound, rx) = mpsc::unbounded_channel();
        let emitter = self.emitter.clone();
        let task = tokio::spawn(async move {
            if let Err(e) = run(sink, stream, rx, &emitter).await {
                error!(error = ?e, "Gemini Live connection failed");
            }
            emitter.emit(&LiveEvent::Close);
        });

        *self.lock() = Some(Connection { outbound, task });
        Ok(())
    }

    /// Stops the I/O task. Returns `false` if there was nothing to stop.
    pub fn disconnect(&self) -> bool {
        let Some(conn) = self.lock().take() else {
            return false;
        };
        if conn.task.is_finished() {
            return false;
        }
        conn.task.abort();
        info!("Gemini Live connection closed by client.");
        self.emitter.emit(&LiveEvent::Close);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LiveClient for GeminiLiveClient {
    fn on(&self, event: &'static str, listener: Listener) -> ListenerId {
        self.emitter.on(event, listener)
    }

    fn off(&self, event: &'static str, id: ListenerId) {
        self.emitter.off(event, id);
    }

    fn send_tool_response(&self, response: ToolResponse) {
        let count = response.function_responses.len();
        match self.lock().as_ref() {
            Some(conn) => {
                if conn
                    .outbound
                    .send(ClientMessage::ToolResponse(response))
                    .is_err()
                {
                    warn!(count, "Gemini Live task has stopped; dropping tool response.");
                }
            }
            None => warn!(count, "Not connected to Gemini Live; dropping tool response."),
        }
    }
}

/// Proxies queued client messages to the socket and server frames to listeners.
async fn run(
    mut sink: SplitSink<LiveSocket, WsMessage>,
    mut stream: SplitStream<LiveSocket>,
    mut outbound: mpsc::UnboundedReceiver<ClientMessage>,
    emitter: &EventEmitter,
) -> Result<()> {
    loop {
        tokio::select! {
            Some(msg) = outbound.recv() => {
                let payload = serde_json::to_string(&msg)?;
                sink.send(WsMessage::Text(payload.into())).await?;
            },
            frame = stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => dispatch(emitter, text.as_bytes()),
                    // The live API delivers its JSON frames as binary messages.
                    Some(Ok(WsMessage::Binary(data))) => dispatch(emitter, &data),
                    Some(Ok(WsMessage::Close(close_frame))) => {
                        info!(?close_frame, "Gemini Live WebSocket closed by server.");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Error reading from Gemini Live WebSocket"),
                    None => break,
                }
            },
        }
    }
    Ok(())
}

fn dispatch(emitter: &EventEmitter, frame: &[u8]) {
    match serde_json::from_slice::<ServerMessage>(frame) {
        Ok(msg) => {
            for event in events_for(msg) {
                debug!(event = event.name(), "Dispatching live event");
                emitter.emit(&event);
            }
        }
        Err(e) => warn!(error = %e, "Skipping undecodable Gemini Live frame"),
    }
}

/// Translates one server frame into the events it carries, in protocol order.
fn events_for(msg: ServerMessage) -> Vec<LiveEvent> {
    let mut events = Vec::new();
    if msg.setup_complete.is_some() {
        events.push(LiveEvent::SetupComplete);
    }
    if let Some(call) = msg.tool_call {
        events.push(LiveEvent::ToolCall(call));
    }
    if let Some(cancellation) = msg.tool_call_cancellation {
        events.push(LiveEvent::ToolCallCancellation(cancellation));
    }
    if let Some(content) = msg.server_content {
        if content.interrupted == Some(true) {
            events.push(LiveEvent::Interrupted);
        }
        if let Some(turn) = content.model_turn {
            events.push(LiveEvent::Content(turn));
        }
        if content.turn_complete == Some(true) {
            events.push(LiveEvent::TurnComplete);
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{OPEN, SETUP_COMPLETE, TOOL_CALL};
    use crate::types::{Content, FunctionResponse, GenerationConfig, ResponseModality};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn text_config() -> LiveConfig {
        LiveConfig {
            model: "models/test".to_string(),
            generation_config: GenerationConfig {
                response_modalities: ResponseModality::Text,
                speech_config: None,
            },
            system_instruction: Content::text("hi"),
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn open_precedes_events_from_server_frames() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            let setup = ws.next().await.unwrap().unwrap();
            ws.send(WsMessage::Binary(br#"{"setupComplete":{}}"#.to_vec().into()))
                .await
                .unwrap();
            setup.into_text().unwrap().to_string()
        });

        let client = GeminiLiveClient::new(format!("ws://{}", addr));
        let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        for name in [OPEN, SETUP_COMPLETE] {
            let seen = seen.clone();
            client.on(
                name,
                Arc::new(move |event: &LiveEvent| seen.lock().unwrap().push(event.name())),
            );
        }

        client.connect(text_config()).await.unwrap();
        let setup = server.await.unwrap();
        assert!(setup.contains(r#""setup""#));

        for _ in 0..100 {
            if seen.lock().unwrap().len() >= 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(*seen.lock().unwrap(), vec!["open", "setupcomplete"]);
        client.disconnect();
    }

    #[test]
    fn server_content_expands_to_ordered_events() {
        let msg: ServerMessage = serde_json::from_str(
            r#"{"serverContent":{"interrupted":true,"modelTurn":{"parts":[]},"turnComplete":true}}"#,
        )
        .unwrap();
        let names: Vec<_> = events_for(msg).iter().map(LiveEvent::name).collect();
        assert_eq!(names, vec!["interrupted", "content", "turncomplete"]);
    }

    #[test]
    fn dispatch_emits_tool_call_and_skips_garbage() {
        let emitter = EventEmitter::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        emitter.on(
            TOOL_CALL,
            Arc::new(move |event: &LiveEvent| {
                if let LiveEvent::ToolCall(call) = event {
                    counter.fetch_add(call.function_calls.len(), Ordering::SeqCst);
                }
            }),
        );

        dispatch(&emitter, b"not json");
        dispatch(
            &emitter,
            br#"{"toolCall":{"functionCalls":[{"id":"1","name":"a"},{"id":"2","name":"b"}]}}"#,
        );

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn endpoint_appends_key() {
        assert_eq!(
            GeminiLiveClient::endpoint("wss://example.test/live", "abc"),
            "wss://example.test/live?key=abc"
        );
    }

    #[test]
    fn disconnected_client_drops_tool_responses() {
        let client = GeminiLiveClient::new("wss://example.test/live");
        assert!(!client.is_connected());
        client.send_tool_response(ToolResponse {
            function_responses: vec![FunctionResponse::success("x")],
        });
        assert!(!client.disconnect());
    }
}
