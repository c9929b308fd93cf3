//! Session actions and the events they produce.
//!
//! Every operation on a [`GameSession`](crate::GameSession) has a matching
//! [`SessionAction`] so that a transport can ship operations as data and
//! apply them with [`GameSession::apply_action`](crate::GameSession::apply_action).

use crate::card::{CardId, Position};
use crate::session::GameResult;
use crate::zone::ZoneKind;
use serde::{Deserialize, Serialize};

fn one() -> usize {
    1
}

/// All operations a player can perform on a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionAction {
    // ==================== Deck Setup ====================
    /// Replace the game with a fresh one built from a deck list
    ImportDeck { deck_list: String },

    // ==================== Life & Turns ====================
    /// Add a signed amount to the life total
    AdjustLife { change: i32 },
    /// Advance the turn counter
    NextTurn,
    /// Record how the game ended (or reopen it)
    SetResult { result: GameResult },

    // ==================== Library ====================
    /// Draw from the top of the library into the hand
    DrawCards {
        #[serde(default = "one")]
        count: usize,
    },
    /// Shuffle the library
    ShuffleLibrary,

    // ==================== Card Movement ====================
    /// Move a card between zones, optionally placing it on the battlefield
    MoveCard {
        card_id: CardId,
        from_zone: ZoneKind,
        to_zone: ZoneKind,
        #[serde(default)]
        position: Option<Position>,
    },
    /// Put a card on top of the library
    MoveToLibraryTop { card_id: CardId, from_zone: ZoneKind },
    /// Put a card on the bottom of the library
    MoveToLibraryBottom { card_id: CardId, from_zone: ZoneKind },

    // ==================== Permanents ====================
    /// Tap or untap a battlefield card
    ToggleTap { card_id: CardId },
    /// Add to (or remove from) a named counter on a battlefield card
    AdjustCounter {
        card_id: CardId,
        counter: String,
        change: i32,
    },

    // ==================== Session ====================
    /// Gather every card back into a shuffled library and start over
    Reset,
}

/// Events describing what an applied action changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    DeckImported {
        cards: usize,
    },
    LifeChanged {
        previous: i32,
        current: i32,
    },
    TurnAdvanced {
        turn: u32,
    },
    ResultRecorded {
        result: GameResult,
    },
    CardsDrawn {
        cards: Vec<CardId>,
    },
    LibraryShuffled {
        cards: usize,
    },
    CardMoved {
        card_id: CardId,
        from: ZoneKind,
        to: ZoneKind,
    },
    CardRepositioned {
        card_id: CardId,
        position: Position,
    },
    CardTapped {
        card_id: CardId,
        tapped: bool,
    },
    CounterChanged {
        card_id: CardId,
        counter: String,
        value: i32,
    },
    SessionReset {
        cards: usize,
    },
}
