//! Card identifier providers.
//!
//! The engine never invents identifiers on its own: every operation that
//! mints cards takes a [`CardIdGenerator`], so tests can make ids
//! deterministic and hosts can pick their own source.

use crate::card::CardId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

/// Source of fresh, session-unique card identifiers.
pub trait CardIdGenerator {
    fn next_id(&mut self) -> CardId;
}

impl<G: CardIdGenerator + ?Sized> CardIdGenerator for &mut G {
    fn next_id(&mut self) -> CardId {
        (**self).next_id()
    }
}

/// Random 128-bit (UUID v4) identifiers drawn from an injected RNG.
#[derive(Debug, Clone)]
pub struct RandomCardIds<R> {
    rng: R,
}

impl<R: Rng> RandomCardIds<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomCardIds<StdRng> {
    /// Deterministic ids for replays and tests
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Ids seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> CardIdGenerator for RandomCardIds<R> {
    fn next_id(&mut self) -> CardId {
        let bytes: [u8; 16] = self.rng.gen();
        Builder::from_random_bytes(bytes).into_uuid().into()
    }
}

/// Counting identifiers (`card-1`, `card-2`, ...).
#[derive(Debug, Clone)]
pub struct SequentialCardIds {
    prefix: String,
    next: u64,
}

impl SequentialCardIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialCardIds {
    fn default() -> Self {
        Self::new("card")
    }
}

impl CardIdGenerator for SequentialCardIds {
    fn next_id(&mut self) -> CardId {
        let id = CardId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seeded_ids_are_deterministic() {
        let mut a = RandomCardIds::seeded(7);
        let mut b = RandomCardIds::seeded(7);
        for _ in 0..10 {
            assert_eq!(a.next_id(), b.next_id());
        }
    }

    #[test]
    fn test_random_ids_are_v4_uuids() {
        let mut ids = RandomCardIds::seeded(1);
        let id = ids.next_id();
        let parsed = uuid::Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_random_ids_are_unique() {
        let mut ids = RandomCardIds::seeded(99);
        let seen: HashSet<CardId> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialCardIds::new("deck");
        assert_eq!(ids.next_id().as_str(), "deck-1");
        assert_eq!(ids.next_id().as_str(), "deck-2");
    }

    #[test]
    fn test_generator_through_mut_ref() {
        fn mint<G: CardIdGenerator>(mut ids: G) -> CardId {
            ids.next_id()
        }
        let mut ids = SequentialCardIds::default();
        assert_eq!(mint(&mut ids).as_str(), "card-1");
        assert_eq!(ids.next_id().as_str(), "card-2");
    }
}
