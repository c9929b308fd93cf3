//! Tabletop - a single-player card game sandbox engine
//!
//! This crate provides the game session state engine for Tabletop:
//! - Card instances with battlefield state (tapped, position, counters)
//! - Five card zones (library, hand, battlefield, graveyard, exile)
//! - Free-text deck list import
//! - An unbiased Fisher-Yates shuffle over an injected random source
//! - The `GameSession` type and every operation that changes it
//!
//! # Architecture
//!
//! The engine is pure and synchronous. It performs no I/O, keeps no global
//! state and never logs; hosts load a session, apply one operation with
//! exclusive access, and persist the result. Randomness and card ids are
//! injected so every operation can be made deterministic.
//!
//! # Modules
//!
//! - [`card`]: Card identity and render metadata
//! - [`zone`]: Zone kinds and ordered card collections
//! - [`deck_list`]: Deck list parsing
//! - [`shuffle`]: Fisher-Yates shuffle
//! - [`ids`]: Card identifier providers
//! - [`session`]: Game session state and operations
//! - [`actions`]: Serializable actions and resulting events

pub mod actions;
pub mod card;
pub mod deck_list;
pub mod ids;
pub mod session;
pub mod shuffle;
pub mod zone;

// Re-export commonly used types
pub use actions::{SessionAction, SessionEvent};
pub use card::{Card, CardId, Position};
pub use deck_list::{parse_deck_list, DeckEntry, DeckList, MAX_DECK_CARDS};
pub use ids::{CardIdGenerator, RandomCardIds, SequentialCardIds};
pub use session::{
    ErrorKind, GameResult, GameSession, SessionConfig, SessionError, DEFAULT_STARTING_LIFE,
    LIFE_MAX, LIFE_MIN,
};
pub use shuffle::shuffle;
pub use zone::{UnknownZone, Zone, ZoneKind, Zones};
