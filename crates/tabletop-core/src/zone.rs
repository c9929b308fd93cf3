//! Card zones.
//!
//! A session has five zones. The library is ordered with its top card at
//! index 0; the other zones are bags, but all of them keep insertion order so
//! that state is deterministic and serializes the same way every time.

use crate::card::{Card, CardId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The five card containers of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    Exile,
}

impl ZoneKind {
    /// All zones, in the order used when gathering cards for a reset
    pub const ALL: [ZoneKind; 5] = [
        ZoneKind::Library,
        ZoneKind::Hand,
        ZoneKind::Battlefield,
        ZoneKind::Graveyard,
        ZoneKind::Exile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneKind::Library => "library",
            ZoneKind::Hand => "hand",
            ZoneKind::Battlefield => "battlefield",
            ZoneKind::Graveyard => "graveyard",
            ZoneKind::Exile => "exile",
        }
    }

    /// Whether card order is part of the zone's meaning
    pub fn is_ordered(&self) -> bool {
        matches!(self, ZoneKind::Library)
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown zone: {0}")]
pub struct UnknownZone(pub String);

impl FromStr for ZoneKind {
    type Err = UnknownZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneKind::ALL
            .into_iter()
            .find(|zone| zone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownZone(s.to_string()))
    }
}

/// An ordered run of cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone {
    cards: Vec<Card>,
}

impl Zone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub(crate) fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    /// Index of a card by id
    pub fn position_of(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == id)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn get_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| &c.id == id)
    }

    /// First card (the top of a library)
    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    /// Remove a card by id, keeping the order of the rest.
    pub fn remove(&mut self, id: &CardId) -> Option<Card> {
        let index = self.position_of(id)?;
        Some(self.cards.remove(index))
    }

    /// Append to the end (the bottom of a library).
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Insert at index 0 (the top of a library).
    pub fn push_front(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    /// Remove up to `count` cards from the front, in order.
    pub fn take_front(&mut self, count: usize) -> Vec<Card> {
        let count = count.min(self.cards.len());
        self.cards.drain(..count).collect()
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    /// Empty the zone, returning its cards in order.
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
}

impl<'a> IntoIterator for &'a Zone {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// The five zones of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zones {
    pub library: Zone,
    pub hand: Zone,
    pub battlefield: Zone,
    pub graveyard: Zone,
    pub exile: Zone,
}

impl Zones {
    /// Zones with the given library and nothing else
    pub fn with_library(cards: Vec<Card>) -> Self {
        Self {
            library: Zone::from_cards(cards),
            ..Self::default()
        }
    }

    pub fn get(&self, kind: ZoneKind) -> &Zone {
        match kind {
            ZoneKind::Library => &self.library,
            ZoneKind::Hand => &self.hand,
            ZoneKind::Battlefield => &self.battlefield,
            ZoneKind::Graveyard => &self.graveyard,
            ZoneKind::Exile => &self.exile,
        }
    }

    pub fn get_mut(&mut self, kind: ZoneKind) -> &mut Zone {
        match kind {
            ZoneKind::Library => &mut self.library,
            ZoneKind::Hand => &mut self.hand,
            ZoneKind::Battlefield => &mut self.battlefield,
            ZoneKind::Graveyard => &mut self.graveyard,
            ZoneKind::Exile => &mut self.exile,
        }
    }

    /// Find which zone holds a card
    pub fn locate(&self, id: &CardId) -> Option<(ZoneKind, &Card)> {
        ZoneKind::ALL
            .into_iter()
            .find_map(|kind| self.get(kind).get(id).map(|card| (kind, card)))
    }

    /// Total cards across all zones
    pub fn total(&self) -> usize {
        ZoneKind::ALL.iter().map(|&kind| self.get(kind).len()).sum()
    }

    /// Every card, zone by zone in [`ZoneKind::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (ZoneKind, &Card)> {
        ZoneKind::ALL
            .into_iter()
            .flat_map(move |kind| self.get(kind).iter().map(move |card| (kind, card)))
    }

    /// Empty every zone, returning all cards in [`ZoneKind::ALL`] order.
    pub fn take_all(&mut self) -> Vec<Card> {
        let mut all = Vec::with_capacity(self.total());
        for kind in ZoneKind::ALL {
            all.extend(self.get_mut(kind).take_all());
        }
        all
    }
}
