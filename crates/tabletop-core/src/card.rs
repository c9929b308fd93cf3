//! Card instances and their on-board metadata.
//!
//! A [`Card`] is one physical copy of a card in a session. It carries its
//! identity, how to render it, and the state that only matters while it sits
//! on the battlefield (tapped flag, board position, counters).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Upper bound of a board coordinate, in percent
pub const BOARD_EXTENT: f64 = 100.0;

/// Image lookup used for cards minted from a deck list
const IMAGE_LOOKUP_URL: &str = "https://api.scryfall.com/cards/named";

/// Image used for the generated placeholder deck
const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/250x350";

/// Unique identifier of a card within a session.
///
/// Engine-minted ids are UUIDs; callers may supply their own ids when they
/// hand a prepared deck to a new session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for CardId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Battlefield placement as percentage-of-board coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The resting position of every card off the battlefield.
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that both coordinates are real numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp both coordinates into the board.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, BOARD_EXTENT),
            y: self.y.clamp(0.0, BOARD_EXTENT),
        }
    }
}

/// One physical card in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub image_url: String,
    /// Only meaningful on the battlefield
    #[serde(default)]
    pub tapped: bool,
    /// Only meaningful on the battlefield
    #[serde(default)]
    pub position: Position,
    /// Named counters (e.g. "+1/+1"), only kept on the battlefield
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counters: BTreeMap<String, i32>,
}

impl Card {
    /// Create an untapped card at the origin
    pub fn new(id: CardId, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: image_url.into(),
            tapped: false,
            position: Position::ORIGIN,
            counters: BTreeMap::new(),
        }
    }

    /// Create a card whose image is looked up by its name.
    pub fn named(id: CardId, name: impl Into<String>) -> Self {
        let name = name.into();
        let image_url = image_url_for(&name);
        Self::new(id, name, image_url)
    }

    /// Create the `index`-th (zero based) card of the placeholder deck.
    pub fn placeholder(id: CardId, index: usize) -> Self {
        let number = index + 1;
        Self::new(
            id,
            format!("Card {}", number),
            format!("{}?text=Card+{}", PLACEHOLDER_IMAGE_URL, number),
        )
    }

    /// Drop all battlefield-only state.
    pub fn reset_board_state(&mut self) {
        self.tapped = false;
        self.position = Position::ORIGIN;
        self.counters.clear();
    }

    /// Current value of a named counter
    pub fn counter(&self, name: &str) -> i32 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Add `delta` to a named counter, forgetting it once it reaches zero.
    /// Returns the new value.
    pub fn add_counter(&mut self, name: &str, delta: i32) -> i32 {
        let value = self.counter(name).saturating_add(delta);
        if value == 0 {
            self.counters.remove(name);
        } else {
            self.counters.insert(name.to_string(), value);
        }
        value
    }
}

/// Image lookup URL for a card name.
pub fn image_url_for(name: &str) -> String {
    match url::Url::parse_with_params(
        IMAGE_LOOKUP_URL,
        &[("format", "image"), ("face", "front"), ("fuzzy", name)],
    ) {
        Ok(url) => url.into(),
        // The base URL is a constant, so parsing cannot fail
        Err(_) => format!("{}?format=image&face=front&fuzzy={}", IMAGE_LOOKUP_URL, name),
    }
}
