//! WebSocket protocol messages for Tabletop.

use serde::{Deserialize, Serialize};
use tabletop_core::{Card, GameSession, SessionEvent};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Start a new session, from a prepared deck or the placeholder deck
    CreateSession {
        #[serde(default)]
        deck: Option<Vec<Card>>,
    },

    /// Fetch the full state of a session
    GetSession { session_id: Uuid },

    /// List the library, top card first
    ViewLibrary { session_id: Uuid },

    /// Apply a session action (see `tabletop_core::SessionAction`)
    Action {
        session_id: Uuid,
        action: serde_json::Value,
    },

    /// Forget a session
    DeleteSession { session_id: Uuid },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with the connection's ID
    Welcome { connection_id: Uuid },

    /// Session created successfully
    SessionCreated {
        session_id: Uuid,
        session: GameSession,
    },

    /// Current session state
    SessionState {
        session_id: Uuid,
        session: GameSession,
    },

    /// Library contents
    Library { session_id: Uuid, cards: Vec<Card> },

    /// Action applied successfully
    ActionResult {
        session_id: Uuid,
        events: Vec<SessionEvent>,
        session: GameSession,
    },

    /// Session removed
    SessionDeleted { session_id: Uuid },

    /// Request failed; `status` follows HTTP conventions (400, 404)
    Error { status: u16, message: String },

    /// Pong response
    Pong,
}

impl ServerMessage {
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            status,
            message: message.into(),
        }
    }
}
