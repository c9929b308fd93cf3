//! Game session state.
//!
//! This module contains the `GameSession` struct and every operation that
//! changes it. A session exclusively owns its five zones; cards only move
//! between zones through the methods here, which keeps the set of card ids in
//! a session fixed between imports.

use crate::actions::{SessionAction, SessionEvent};
use crate::card::{Card, CardId, Position};
use crate::deck_list::parse_deck_list;
use crate::ids::CardIdGenerator;
use crate::shuffle::shuffle;
use crate::zone::{Zone, ZoneKind, Zones};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Default starting life total
pub const DEFAULT_STARTING_LIFE: i32 = 20;

/// Size of the generated deck used when a session starts without one
pub const PLACEHOLDER_DECK_SIZE: usize = 60;

/// Lowest life total kept by `adjust_life`
pub const LIFE_MIN: i32 = -100;

/// Highest life total kept by `adjust_life`
pub const LIFE_MAX: i32 = 200;

/// Outcome of a game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    #[default]
    Ongoing,
    Win,
    Loss,
    Draw,
}

/// Broad class of a [`SessionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or empty input
    Validation,
    /// A card is not where the caller said it was
    NotFound,
}

/// Errors that can occur when applying operations
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum SessionError {
    #[error("Deck list is empty")]
    EmptyDeckList,

    #[error("No valid cards found in deck list")]
    NoValidCards,

    #[error("Line {line}: quantity {quantity} is too large")]
    QuantityTooLarge { line: usize, quantity: String },

    #[error("Position coordinates must be finite numbers")]
    InvalidPosition,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Card {0} not found on battlefield")]
    CardNotOnBattlefield(CardId),

    #[error("Card {card} not found in {zone}")]
    CardNotFoundInZone { card: CardId, zone: ZoneKind },
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::EmptyDeckList
            | SessionError::NoValidCards
            | SessionError::QuantityTooLarge { .. }
            | SessionError::InvalidPosition
            | SessionError::MissingField(_) => ErrorKind::Validation,
            SessionError::CardNotOnBattlefield(_) | SessionError::CardNotFoundInZone { .. } => {
                ErrorKind::NotFound
            }
        }
    }
}

/// Settings applied when a session is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_life: i32,
    pub player_name: String,
    pub format: String,
    pub placeholder_deck_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_life: DEFAULT_STARTING_LIFE,
            player_name: "Player".to_string(),
            format: "casual".to_string(),
            placeholder_deck_size: PLACEHOLDER_DECK_SIZE,
        }
    }
}

/// The complete state of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    player_name: String,
    format: String,
    life: i32,
    starting_life: i32,
    /// Turn number (starts at 1)
    turn: u32,
    zones: Zones,
    result: GameResult,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Create a session with default settings.
    ///
    /// The library is `deck` when given, otherwise a generated placeholder
    /// deck.
    pub fn new<G: CardIdGenerator + ?Sized>(deck: Option<Vec<Card>>, ids: &mut G) -> Self {
        Self::with_config(SessionConfig::default(), deck, ids)
    }

    /// Create a session with explicit settings
    pub fn with_config<G: CardIdGenerator + ?Sized>(
        config: SessionConfig,
        deck: Option<Vec<Card>>,
        ids: &mut G,
    ) -> Self {
        let library = match deck {
            Some(cards) => prepare_deck(cards, ids),
            None => (0..config.placeholder_deck_size)
                .map(|i| Card::placeholder(ids.next_id(), i))
                .collect(),
        };

        let now = Utc::now();
        Self {
            player_name: config.player_name,
            format: config.format,
            life: config.starting_life,
            starting_life: config.starting_life,
            turn: 1,
            zones: Zones::with_library(library),
            result: GameResult::Ongoing,
            created_at: now,
            updated_at: now,
            started_at: now,
            ended_at: None,
        }
    }

    // ==================== Accessors ====================

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn starting_life(&self) -> i32 {
        self.starting_life
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    pub fn zone(&self, kind: ZoneKind) -> &Zone {
        self.zones.get(kind)
    }

    /// The library, top card first
    pub fn library(&self) -> &[Card] {
        self.zones.library.cards()
    }

    pub fn hand(&self) -> &[Card] {
        self.zones.hand.cards()
    }

    pub fn battlefield(&self) -> &[Card] {
        self.zones.battlefield.cards()
    }

    pub fn graveyard(&self) -> &[Card] {
        self.zones.graveyard.cards()
    }

    pub fn exile(&self) -> &[Card] {
        self.zones.exile.cards()
    }

    /// Find a card in any zone
    pub fn find_card(&self, id: &CardId) -> Option<(ZoneKind, &Card)> {
        self.zones.locate(id)
    }

    /// Total cards across all zones
    pub fn card_count(&self) -> usize {
        self.zones.total()
    }

    /// Whole minutes played, up to `ended_at` or `now`
    pub fn duration(&self, now: DateTime<Utc>) -> i64 {
        let end = self.ended_at.unwrap_or(now);
        (end - self.started_at).num_minutes()
    }

    pub fn is_finished(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    // ==================== Operations ====================

    /// Replace the game with a fresh one built from `deck_list`.
    ///
    /// The library becomes the parsed cards, every other zone is emptied and
    /// life goes back to the starting total. Returns the number of cards.
    pub fn import_deck<G: CardIdGenerator + ?Sized>(
        &mut self,
        deck_list: &str,
        ids: &mut G,
    ) -> Result<usize, SessionError> {
        let cards = parse_deck_list(deck_list, ids)?;
        let count = cards.len();

        self.zones = Zones::with_library(cards);
        self.restart();
        self.touch();

        Ok(count)
    }

    /// Add `delta` to the life total.
    ///
    /// The result saturates at [`LIFE_MIN`]..=[`LIFE_MAX`]. A total already
    /// outside that range (a custom starting life, say) is never pulled back
    /// into it; it just cannot move further out.
    pub fn adjust_life(&mut self, delta: i32) -> i32 {
        let low = LIFE_MIN.min(self.life);
        let high = LIFE_MAX.max(self.life);
        self.life = self.life.saturating_add(delta).clamp(low, high);
        self.touch();
        self.life
    }

    /// Draw up to `count` cards from the top of the library.
    ///
    /// Drawing more than the library holds drains it; drawing from an empty
    /// library draws nothing. Returns the ids drawn, in order.
    pub fn draw_cards(&mut self, count: usize) -> Vec<CardId> {
        let drawn = self.zones.library.take_front(count);
        let ids = drawn.iter().map(|c| c.id.clone()).collect();
        self.zones.hand.extend(drawn);
        self.touch();
        ids
    }

    /// Flip the tapped state of a battlefield card. Returns the new state.
    pub fn toggle_tap(&mut self, id: &CardId) -> Result<bool, SessionError> {
        let card = self
            .zones
            .battlefield
            .get_mut(id)
            .ok_or_else(|| SessionError::CardNotOnBattlefield(id.clone()))?;

        card.tapped = !card.tapped;
        let tapped = card.tapped;
        self.touch();
        Ok(tapped)
    }

    /// Move a card from one zone to the end of another.
    ///
    /// Entering (or staying on) the battlefield applies `position` when
    /// given. A battlefield to battlefield move only repositions the card in
    /// place. Any other destination resets tapped state, position and
    /// counters.
    pub fn move_card(
        &mut self,
        id: &CardId,
        from: ZoneKind,
        to: ZoneKind,
        position: Option<Position>,
    ) -> Result<(), SessionError> {
        let position = position.map(validate_position).transpose()?;

        if from == ZoneKind::Battlefield && to == ZoneKind::Battlefield {
            let card = self
                .zones
                .battlefield
                .get_mut(id)
                .ok_or_else(|| not_found(id, from))?;
            if let Some(position) = position {
                card.position = position;
            }
            self.touch();
            return Ok(());
        }

        let mut card = self.take_card(id, from)?;
        if to == ZoneKind::Battlefield {
            if let Some(position) = position {
                card.position = position;
            }
        } else {
            card.reset_board_state();
        }
        self.zones.get_mut(to).push(card);
        self.touch();
        Ok(())
    }

    /// Put a card on top of the library.
    pub fn move_to_library_top(&mut self, id: &CardId, from: ZoneKind) -> Result<(), SessionError> {
        let mut card = self.take_card(id, from)?;
        card.reset_board_state();
        self.zones.library.push_front(card);
        self.touch();
        Ok(())
    }

    /// Put a card on the bottom of the library.
    pub fn move_to_library_bottom(
        &mut self,
        id: &CardId,
        from: ZoneKind,
    ) -> Result<(), SessionError> {
        let mut card = self.take_card(id, from)?;
        card.reset_board_state();
        self.zones.library.push(card);
        self.touch();
        Ok(())
    }

    /// Shuffle the library. Other zones are untouched.
    pub fn shuffle_library<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle(self.zones.library.cards_mut(), rng);
        self.touch();
    }

    /// Gather every card into a freshly shuffled library and start over.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut cards = self.zones.take_all();
        for card in &mut cards {
            card.reset_board_state();
        }
        shuffle(&mut cards, rng);

        self.zones = Zones::with_library(cards);
        self.restart();
        self.touch();
    }

    /// Change a named counter on a battlefield card. Returns the new value.
    pub fn adjust_counter(
        &mut self,
        id: &CardId,
        counter: &str,
        delta: i32,
    ) -> Result<i32, SessionError> {
        let counter = counter.trim();
        if counter.is_empty() {
            return Err(SessionError::MissingField("counter".to_string()));
        }

        let card = self
            .zones
            .battlefield
            .get_mut(id)
            .ok_or_else(|| SessionError::CardNotOnBattlefield(id.clone()))?;
        let value = card.add_counter(counter, delta);
        self.touch();
        Ok(value)
    }

    /// Advance to the next turn. Returns the new turn number.
    pub fn next_turn(&mut self) -> u32 {
        self.turn = self.turn.saturating_add(1);
        self.touch();
        self.turn
    }

    /// Record the outcome of the game.
    ///
    /// Any result other than `Ongoing` stamps `ended_at`; `Ongoing` reopens
    /// the game.
    pub fn set_result(&mut self, result: GameResult) {
        self.result = result;
        let now = Utc::now();
        self.ended_at = match result {
            GameResult::Ongoing => None,
            _ => Some(now),
        };
        self.updated_at = now;
    }

    /// Apply an action, returning the events it produced.
    ///
    /// On error the session is left exactly as it was.
    pub fn apply_action<R, G>(
        &mut self,
        action: SessionAction,
        rng: &mut R,
        ids: &mut G,
    ) -> Result<Vec<SessionEvent>, SessionError>
    where
        R: Rng + ?Sized,
        G: CardIdGenerator + ?Sized,
    {
        let mut events = Vec::new();

        match action {
            // ==================== Deck Setup ====================
            SessionAction::ImportDeck { deck_list } => {
                let cards = self.import_deck(&deck_list, ids)?;
                events.push(SessionEvent::DeckImported { cards });
            }

            // ==================== Life & Turns ====================
            SessionAction::AdjustLife { change } => {
                let previous = self.life;
                let current = self.adjust_life(change);
                events.push(SessionEvent::LifeChanged { previous, current });
            }
            SessionAction::NextTurn => {
                let turn = self.next_turn();
                events.push(SessionEvent::TurnAdvanced { turn });
            }
            SessionAction::SetResult { result } => {
                self.set_result(result);
                events.push(SessionEvent::ResultRecorded { result });
            }

            // ==================== Library ====================
            SessionAction::DrawCards { count } => {
                let cards = self.draw_cards(count);
                events.push(SessionEvent::CardsDrawn { cards });
            }
            SessionAction::ShuffleLibrary => {
                self.shuffle_library(rng);
                events.push(SessionEvent::LibraryShuffled {
                    cards: self.zones.library.len(),
                });
            }

            // ==================== Card Movement ====================
            SessionAction::MoveCard {
                card_id,
                from_zone,
                to_zone,
                position,
            } => {
                self.move_card(&card_id, from_zone, to_zone, position)?;
                if from_zone == ZoneKind::Battlefield && to_zone == ZoneKind::Battlefield {
                    let position = self
                        .zones
                        .battlefield
                        .get(&card_id)
                        .map(|c| c.position)
                        .unwrap_or_default();
                    events.push(SessionEvent::CardRepositioned { card_id, position });
                } else {
                    events.push(SessionEvent::CardMoved {
                        card_id,
                        from: from_zone,
                        to: to_zone,
                    });
                }
            }
            SessionAction::MoveToLibraryTop { card_id, from_zone } => {
                self.move_to_library_top(&card_id, from_zone)?;
                events.push(SessionEvent::CardMoved {
                    card_id,
                    from: from_zone,
                    to: ZoneKind::Library,
                });
            }
            SessionAction::MoveToLibraryBottom { card_id, from_zone } => {
                self.move_to_library_bottom(&card_id, from_zone)?;
                events.push(SessionEvent::CardMoved {
                    card_id,
                    from: from_zone,
                    to: ZoneKind::Library,
                });
            }

            // ==================== Permanents ====================
            SessionAction::ToggleTap { card_id } => {
                let tapped = self.toggle_tap(&card_id)?;
                events.push(SessionEvent::CardTapped { card_id, tapped });
            }
            SessionAction::AdjustCounter {
                card_id,
                counter,
                change,
            } => {
                let value = self.adjust_counter(&card_id, &counter, change)?;
                events.push(SessionEvent::CounterChanged {
                    card_id,
                    counter: counter.trim().to_string(),
                    value,
                });
            }

            // ==================== Session ====================
            SessionAction::Reset => {
                self.reset(rng);
                events.push(SessionEvent::SessionReset {
                    cards: self.zones.library.len(),
                });
            }
        }

        Ok(events)
    }

    // ==================== Serialization ====================

    /// Serialize the whole session to a JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a session from [`GameSession::to_json`] output.
    ///
    /// Fails if the document holds the same card id twice.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let session: Self = serde_json::from_str(json)?;
        if let Some(id) = session.duplicate_card_id() {
            return Err(serde::de::Error::custom(format!(
                "duplicate card id {} in session",
                id
            )));
        }
        Ok(session)
    }

    // ==================== Helper Methods ====================

    fn duplicate_card_id(&self) -> Option<&CardId> {
        let mut seen = HashSet::with_capacity(self.card_count());
        self.zones
            .iter()
            .map(|(_, card)| &card.id)
            .find(|id| !seen.insert(*id))
    }

    fn take_card(&mut self, id: &CardId, from: ZoneKind) -> Result<Card, SessionError> {
        self.zones
            .get_mut(from)
            .remove(id)
            .ok_or_else(|| not_found(id, from))
    }

    /// Scalars shared by import and reset
    fn restart(&mut self) {
        self.life = self.starting_life;
        self.turn = 1;
        self.result = GameResult::Ongoing;
        self.started_at = Utc::now();
        self.ended_at = None;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn not_found(id: &CardId, zone: ZoneKind) -> SessionError {
    SessionError::CardNotFoundInZone {
        card: id.clone(),
        zone,
    }
}

fn validate_position(position: Position) -> Result<Position, SessionError> {
    if position.is_finite() {
        Ok(position.clamped())
    } else {
        Err(SessionError::InvalidPosition)
    }
}

/// Give any card whose id repeats an earlier one a fresh id, and clear
/// board state a caller may have left on it.
fn prepare_deck<G: CardIdGenerator + ?Sized>(cards: Vec<Card>, ids: &mut G) -> Vec<Card> {
    let mut seen = HashSet::with_capacity(cards.len());
    cards
        .into_iter()
        .map(|mut card| {
            while !seen.insert(card.id.clone()) {
                card.id = ids.next_id();
            }
            card.reset_board_state();
            card
        })
        .collect()
}
