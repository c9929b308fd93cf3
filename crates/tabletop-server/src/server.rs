//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::store::{SessionStore, StoreError};
use futures_util::{SinkExt, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use std::sync::Arc;
use tabletop_core::{GameSession, RandomCardIds, SessionAction, SessionConfig};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState<S> {
    /// All sessions
    pub store: S,
    /// Settings for new sessions
    pub session_config: SessionConfig,
}

impl<S: SessionStore> ServerState<S> {
    pub fn new(store: S, session_config: SessionConfig) -> Self {
        Self {
            store,
            session_config,
        }
    }
}

/// Per-connection randomness and id source.
pub struct Connection {
    pub id: Uuid,
    rng: StdRng,
    ids: RandomCardIds<StdRng>,
}

impl Connection {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            rng: StdRng::from_entropy(),
            ids: RandomCardIds::from_entropy(),
        }
    }

    /// Deterministic shuffles and card ids
    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            id: Uuid::nil(),
            rng: StdRng::seed_from_u64(seed),
            ids: RandomCardIds::seeded(seed),
        }
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the WebSocket server.
pub async fn run_server<S>(addr: SocketAddr, state: Arc<ServerState<S>>) -> anyhow::Result<()>
where
    S: SessionStore + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("Tabletop server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection<S: SessionStore>(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState<S>>,
) -> anyhow::Result<()> {
    let mut ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let mut conn = Connection::new();

    let welcome = ServerMessage::Welcome {
        connection_id: conn.id,
    };
    ws_stream
        .send(Message::Text(serde_json::to_string(&welcome)?))
        .await?;

    while let Some(msg) = ws_stream.next().await {
        let reply = match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(&mut conn, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", conn.id, text);
                    ServerMessage::error(400, format!("Invalid message: {}", e))
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", conn.id);
                break;
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", conn.id, e);
                break;
            }
            _ => continue,
        };

        ws_stream
            .send(Message::Text(serde_json::to_string(&reply)?))
            .await?;
    }

    info!("Connection closed for {}", conn.id);
    Ok(())
}

/// Handle a client message, producing the reply.
pub fn handle_message<S: SessionStore>(
    conn: &mut Connection,
    msg: ClientMessage,
    state: &ServerState<S>,
) -> ServerMessage {
    match msg {
        ClientMessage::CreateSession { deck } => {
            let session =
                GameSession::with_config(state.session_config.clone(), deck, &mut conn.ids);
            let session_id = state.store.create(session.clone());
            info!(%session_id, cards = session.card_count(), "Session created");

            ServerMessage::SessionCreated {
                session_id,
                session,
            }
        }

        ClientMessage::GetSession { session_id } => match state.store.load(session_id) {
            Ok(session) => ServerMessage::SessionState {
                session_id,
                session,
            },
            Err(e) => error_reply(e),
        },

        ClientMessage::ViewLibrary { session_id } => match state.store.load(session_id) {
            Ok(session) => ServerMessage::Library {
                session_id,
                cards: session.library().to_vec(),
            },
            Err(e) => error_reply(e),
        },

        ClientMessage::Action { session_id, action } => {
            let action: SessionAction = match serde_json::from_value(action) {
                Ok(action) => action,
                Err(e) => {
                    warn!(%session_id, "Invalid action from {}: {}", conn.id, e);
                    return ServerMessage::error(400, format!("Invalid action: {}", e));
                }
            };

            let Connection { rng, ids, .. } = conn;
            match state
                .store
                .apply(session_id, |session| session.apply_action(action, rng, ids))
            {
                Ok((events, session)) => {
                    debug!(%session_id, events = events.len(), "Action applied");
                    ServerMessage::ActionResult {
                        session_id,
                        events,
                        session,
                    }
                }
                Err(e) => error_reply(e),
            }
        }

        ClientMessage::DeleteSession { session_id } => match state.store.remove(session_id) {
            Ok(_) => {
                info!(%session_id, "Session deleted");
                ServerMessage::SessionDeleted { session_id }
            }
            Err(e) => error_reply(e),
        },

        ClientMessage::Ping => ServerMessage::Pong,
    }
}

fn error_reply(e: StoreError) -> ServerMessage {
    debug!("Request failed: {}", e);
    ServerMessage::error(e.status(), e.to_string())
}
