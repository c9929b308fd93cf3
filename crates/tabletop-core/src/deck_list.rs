//! Free-text deck list parsing.
//!
//! A deck list is one entry per line, `[count] name`:
//!
//! ```text
//! 4 Lightning Bolt
//! 4x Counterspell
//! Forest
//! ```
//!
//! The count is optional and defaults to 1. A count that parses to zero or
//! less also yields a single copy. Blank lines, `//` and `#` comments and
//! section headers such as `Sideboard:` are skipped. Only the header line is
//! dropped: cards listed under `Sideboard:` still land in the library.
//!
//! A list may describe at most [`MAX_DECK_CARDS`] cards in total; a count
//! that would pass that limit fails with `QuantityTooLarge`.

use crate::card::Card;
use crate::ids::CardIdGenerator;
use crate::session::SessionError;
use serde::{Deserialize, Serialize};

/// Most cards one deck list can mint
pub const MAX_DECK_CARDS: usize = 100_000;

/// One parsed line of a deck list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub quantity: u32,
    pub name: String,
}

/// A parsed deck list, in the order the lines appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    pub entries: Vec<DeckEntry>,
}

impl DeckList {
    /// Parse deck list text without minting any cards.
    pub fn parse(text: &str) -> Result<Self, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyDeckList);
        }

        let mut entries = Vec::new();
        let mut total = 0;
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if is_skippable(line) {
                continue;
            }
            let (quantity, name) = split_count(line);
            let quantity = clamp_quantity(quantity, index + 1, MAX_DECK_CARDS - total)?;
            total += quantity as usize;
            entries.push(DeckEntry {
                quantity,
                name: name.to_string(),
            });
        }

        if entries.is_empty() {
            return Err(SessionError::NoValidCards);
        }

        Ok(Self { entries })
    }

    /// Total number of cards the list describes
    pub fn total_cards(&self) -> usize {
        self.entries.iter().map(|e| e.quantity as usize).sum()
    }

    /// Mint one card per copy, preserving list order.
    pub fn into_cards<G: CardIdGenerator + ?Sized>(self, ids: &mut G) -> Vec<Card> {
        let mut cards = Vec::with_capacity(self.total_cards());
        for entry in self.entries {
            for _ in 0..entry.quantity {
                cards.push(Card::named(ids.next_id(), entry.name.clone()));
            }
        }
        cards
    }
}

/// Parse a deck list and mint its cards.
pub fn parse_deck_list<G: CardIdGenerator + ?Sized>(
    text: &str,
    ids: &mut G,
) -> Result<Vec<Card>, SessionError> {
    let cards = DeckList::parse(text)?.into_cards(ids);
    if cards.is_empty() {
        return Err(SessionError::NoValidCards);
    }
    Ok(cards)
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with("//") || line.starts_with('#') || line.ends_with(':')
}

/// Count as written on the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Count {
    Missing,
    Value(i64),
    Overflow,
}

/// Split a trimmed, non-empty line into its count and name.
///
/// The name must not be empty, so a line that is only a number is a card
/// named after that number.
fn split_count(line: &str) -> (Count, &str) {
    let unsigned = line.strip_prefix('-').unwrap_or(line);
    let digits = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return (Count::Missing, line);
    }

    let sign = line.len() - unsigned.len();
    let number = &line[..sign + digits];
    let mut rest = &unsigned[digits..];

    // "4x Lightning Bolt"
    if let Some(after) = rest.strip_prefix(|c: char| c == 'x' || c == 'X') {
        if after.starts_with(char::is_whitespace) {
            rest = after;
        }
    }

    let name = rest.trim();
    if name.is_empty() {
        return (Count::Missing, line);
    }

    let count = match number.parse::<i64>() {
        Ok(value) => Count::Value(value),
        Err(_) => Count::Overflow,
    };
    (count, name)
}

/// Resolve a count to a copy number, given how many cards the list may
/// still add.
fn clamp_quantity(count: Count, line: usize, remaining: usize) -> Result<u32, SessionError> {
    let quantity = match count {
        Count::Missing => 1,
        Count::Value(value) if value < 1 => 1,
        Count::Value(value) => value,
        Count::Overflow => {
            return Err(SessionError::QuantityTooLarge {
                line,
                quantity: "overflow".to_string(),
            })
        }
    };

    if quantity as u64 > remaining as u64 {
        return Err(SessionError::QuantityTooLarge {
            line,
            quantity: quantity.to_string(),
        });
    }
    Ok(quantity as u32)
}
