use crate::prelude::{eprintln, *};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tower_http::cors::{Any, CorsLayer};

/// Responses queued per session before a slow SSE reader applies back-pressure.
const SESSION_BUFFER: usize = 32;

/// Settings plus one outbound channel per open `/sse` stream, keyed by session id.
struct ServerState {
    global: crate::Global,
    sessions: RwLock<HashMap<String, mpsc::Sender<String>>>,
    next_session: AtomicU64,
}

type SharedState = Arc<ServerState>;

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

pub async fn run_sse(options: super::cli::HttpOptions, global: crate::Global) -> Result<()> {
    let addr = f!("{}:{}", options.host, options.port);
    let verbose = global.verbose;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("MCP server listening on http://{addr}");
    if verbose {
        eprintln!("SSE endpoint: http://{addr}/sse");
        eprintln!("Message endpoint: http://{addr}/message");
    }

    axum::serve(listener, router(global))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

pub fn router(global: crate::Global) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(ServerState {
        global,
        sessions: RwLock::new(HashMap::new()),
        next_session: AtomicU64::new(1),
    });

    Router::new()
        .route("/sse", get(sse_handler))
        .route("/message", post(message_handler))
        .layer(cors)
        .with_state(state)
}

/// Open an MCP session.
///
/// The first event is `endpoint`, naming the URL the client posts its requests
/// to. Every later `message` event carries one JSON-RPC response. The stream
/// stays open until the client goes away.
async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = f!("{:016x}", state.next_session.fetch_add(1, Ordering::Relaxed));
    let (sender, receiver) = mpsc::channel::<String>(SESSION_BUFFER);
    state
        .sessions
        .write()
        .await
        .insert(session_id.clone(), sender);

    log::info!("MCP session {session_id} opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(f!("/message?sessionId={session_id}"));

    let messages = stream::unfold(receiver, |mut receiver| async move {
        let payload = receiver.recv().await;
        payload.map(|payload| {
            let event = Event::default().event("message").data(payload);
            (Ok::<_, Infallible>(event), receiver)
        })
    });

    let events = stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages);

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle one JSON-RPC message.
///
/// With a `sessionId` the request is accepted right away and its response is
/// delivered on that session's SSE stream. Without one the response comes back
/// as the HTTP body, so plain HTTP clients can skip the stream.
async fn message_handler(
    State(state): State<SharedState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(session_id) = query.session_id else {
        return match super::handle_request(&body, &state.global).await {
            Some(response) => Json(response).into_response(),
            None => StatusCode::ACCEPTED.into_response(),
        };
    };

    let Some(sender) = state.sessions.read().await.get(&session_id).cloned() else {
        return (StatusCode::NOT_FOUND, f!("Unknown session: {session_id}")).into_response();
    };

    tokio::spawn(async move {
        let Some(response) = super::handle_request(&body, &state.global).await else {
            return;
        };

        let payload = match serde_json::to_string(&response) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Failed to serialize MCP response: {e}");
                return;
            }
        };

        if sender.send(payload).await.is_err() {
            state.sessions.write().await.remove(&session_id);
            log::info!("MCP session {session_id} closed");
        }
    });

    StatusCode::ACCEPTED.into_response()
}
