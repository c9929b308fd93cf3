//! Integration tests for the Tabletop session engine.
//!
//! These tests drive whole sessions through the public API: import, draw,
//! move, tap, shuffle and reset, checking that no card is ever lost or
//! duplicated along the way.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tabletop_core::*;

/// Multiset of card ids across all zones
fn id_multiset(session: &GameSession) -> BTreeMap<CardId, usize> {
    let mut counts = BTreeMap::new();
    for (_, card) in session.zones().iter() {
        *counts.entry(card.id.clone()).or_insert(0) += 1;
    }
    counts
}

fn names(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.name.as_str()).collect()
}

/// A session whose library is a known 60-card deck
fn sixty_card_session() -> GameSession {
    let mut ids = SequentialCardIds::new("deck");
    let deck: Vec<Card> = (0..60)
        .map(|i| Card::named(ids.next_id(), format!("Card {}", i + 1)))
        .collect();
    GameSession::new(Some(deck), &mut SequentialCardIds::new("spare"))
}

/// Spread cards over every zone
fn spread_session() -> GameSession {
    let mut session = sixty_card_session();
    session.draw_cards(10);
    let hand: Vec<CardId> = session.hand().iter().map(|c| c.id.clone()).collect();

    session
        .move_card(&hand[0], ZoneKind::Hand, ZoneKind::Battlefield, Some(Position::new(20.0, 30.0)))
        .unwrap();
    session
        .move_card(&hand[1], ZoneKind::Hand, ZoneKind::Battlefield, Some(Position::new(60.0, 30.0)))
        .unwrap();
    session.toggle_tap(&hand[0]).unwrap();
    session.adjust_counter(&hand[1], "+1/+1", 2).unwrap();
    session
        .move_card(&hand[2], ZoneKind::Hand, ZoneKind::Graveyard, None)
        .unwrap();
    session
        .move_card(&hand[3], ZoneKind::Hand, ZoneKind::Exile, None)
        .unwrap();
    session.adjust_life(-8);
    session.next_turn();
    session
}

#[test]
fn test_import_deck_scenario() {
    let mut session = GameSession::new(None, &mut SequentialCardIds::default());
    session.draw_cards(7);

    session
        .import_deck("4 Lightning Bolt\nForest\n2 Island", &mut RandomCardIds::seeded(3))
        .unwrap();

    assert_eq!(
        names(session.library()),
        vec![
            "Lightning Bolt",
            "Lightning Bolt",
            "Lightning Bolt",
            "Lightning Bolt",
            "Forest",
            "Island",
            "Island"
        ]
    );
    assert_eq!(session.life(), 20);
    assert!(session.hand().is_empty());
    assert!(session.battlefield().is_empty());
    assert!(session.graveyard().is_empty());
    assert!(session.exile().is_empty());

    // Every minted card has its own id
    assert_eq!(id_multiset(&session).len(), 7);
}

#[test]
fn test_draw_seven_from_sixty() {
    let mut session = sixty_card_session();
    let top_seven: Vec<CardId> = session.library()[..7].iter().map(|c| c.id.clone()).collect();

    let drawn = session.draw_cards(7);

    assert_eq!(session.hand().len(), 7);
    assert_eq!(session.library().len(), 53);
    assert_eq!(drawn, top_seven);
    let hand_ids: Vec<CardId> = session.hand().iter().map(|c| c.id.clone()).collect();
    assert_eq!(hand_ids, top_seven);
}

#[test]
fn test_draw_more_than_library() {
    let mut session = GameSession::new(None, &mut SequentialCardIds::default());
    session.import_deck("3 Swamp", &mut SequentialCardIds::new("s")).unwrap();

    let drawn = session.draw_cards(10);
    assert_eq!(drawn.len(), 3);
    assert_eq!(session.hand().len(), 3);
    assert!(session.library().is_empty());

    // Empty library: no-op, not an error
    assert!(session.draw_cards(1).is_empty());
    assert_eq!(session.hand().len(), 3);
}

#[test]
fn test_play_then_destroy_scenario() {
    let mut session = sixty_card_session();
    session.draw_cards(1);
    let card_id = session.hand()[0].id.clone();

    session
        .move_card(&card_id, ZoneKind::Hand, ZoneKind::Battlefield, Some(Position::new(50.0, 50.0)))
        .unwrap();
    session.toggle_tap(&card_id).unwrap();
    assert_eq!(session.battlefield()[0].position, Position::new(50.0, 50.0));

    session
        .move_card(&card_id, ZoneKind::Battlefield, ZoneKind::Graveyard, None)
        .unwrap();

    let (zone, card) = session.find_card(&card_id).unwrap();
    assert_eq!(zone, ZoneKind::Graveyard);
    assert!(!card.tapped);
    assert_eq!(card.position, Position::ORIGIN);
    assert!(session.hand().is_empty());
    assert!(session.battlefield().is_empty());
}

#[test]
fn test_battlefield_reposition_only_changes_position() {
    let mut session = spread_session();
    let before = session.clone();
    let target = session.battlefield()[1].id.clone();

    session
        .move_card(&target, ZoneKind::Battlefield, ZoneKind::Battlefield, Some(Position::new(75.0, 10.0)))
        .unwrap();

    assert_eq!(session.battlefield().len(), before.battlefield().len());
    for (after, prior) in session.battlefield().iter().zip(before.battlefield()) {
        if after.id == target {
            assert_eq!(after.position, Position::new(75.0, 10.0));
            assert_eq!(after.tapped, prior.tapped);
            assert_eq!(after.counters, prior.counters);
        } else {
            assert_eq!(after, prior);
        }
    }
}

#[test]
fn test_double_toggle_restores_tap_state() {
    let mut session = spread_session();
    for card in session.battlefield().to_vec() {
        session.toggle_tap(&card.id).unwrap();
        session.toggle_tap(&card.id).unwrap();
        let (_, after) = session.find_card(&card.id).unwrap();
        assert_eq!(after.tapped, card.tapped);
    }
}

#[test]
fn test_reset_scenario() {
    let mut session = spread_session();
    let total = session.card_count();
    let ids_before = id_multiset(&session);

    session.reset(&mut StdRng::seed_from_u64(8));

    assert_eq!(session.library().len(), total);
    assert!(session.hand().is_empty());
    assert!(session.battlefield().is_empty());
    assert!(session.graveyard().is_empty());
    assert!(session.exile().is_empty());
    assert_eq!(session.life(), session.starting_life());
    assert_eq!(session.turn(), 1);
    assert!(session
        .library()
        .iter()
        .all(|c| !c.tapped && c.position == Position::ORIGIN && c.counters.is_empty()));
    assert_eq!(id_multiset(&session), ids_before);
}

#[test]
fn test_reset_is_deterministic_per_seed() {
    let mut a = spread_session();
    let mut b = a.clone();
    a.reset(&mut StdRng::seed_from_u64(42));
    b.reset(&mut StdRng::seed_from_u64(42));
    assert_eq!(a.library(), b.library());
}

#[test]
fn test_actions_through_json() {
    let mut session = sixty_card_session();
    let mut rng = StdRng::seed_from_u64(5);
    let mut ids = RandomCardIds::seeded(5);

    let script = r#"[
        { "type": "draw_cards", "count": 3 },
        { "type": "adjust_life", "change": -2 },
        { "type": "next_turn" },
        { "type": "shuffle_library" }
    ]"#;
    let actions: Vec<SessionAction> = serde_json::from_str(script).unwrap();
    for action in actions {
        session.apply_action(action, &mut rng, &mut ids).unwrap();
    }

    assert_eq!(session.hand().len(), 3);
    assert_eq!(session.library().len(), 57);
    assert_eq!(session.life(), 18);
    assert_eq!(session.turn(), 2);
}

#[test]
fn test_session_json_round_trip() {
    let session = spread_session();
    let json = session.to_json().unwrap();
    let restored = GameSession::from_json(&json).unwrap();

    assert_eq!(restored, session);
    for kind in ZoneKind::ALL {
        assert_eq!(restored.zone(kind).cards(), session.zone(kind).cards());
    }
}

#[test]
fn test_sessions_are_independent() {
    let mut first = sixty_card_session();
    let second = sixty_card_session();
    first.draw_cards(5);
    assert_eq!(second.library().len(), 60);
    assert!(second.hand().is_empty());
}

// ==================== Conservation ====================

fn zone_strategy() -> impl Strategy<Value = ZoneKind> {
    prop::sample::select(ZoneKind::ALL.to_vec())
}

/// Abstract operation; card choices are indices into the current zones
#[derive(Debug, Clone)]
enum Op {
    Draw(usize),
    Move(ZoneKind, ZoneKind, usize, Option<(f64, f64)>),
    Top(ZoneKind, usize),
    Bottom(ZoneKind, usize),
    Tap(usize),
    Counter(usize, i32),
    Shuffle,
    Reset,
    Life(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..10).prop_map(Op::Draw),
        (
            zone_strategy(),
            zone_strategy(),
            0usize..64,
            prop::option::of((0.0f64..100.0, 0.0f64..100.0))
        )
            .prop_map(|(from, to, i, pos)| Op::Move(from, to, i, pos)),
        (zone_strategy(), 0usize..64).prop_map(|(z, i)| Op::Top(z, i)),
        (zone_strategy(), 0usize..64).prop_map(|(z, i)| Op::Bottom(z, i)),
        (0usize..64).prop_map(Op::Tap),
        (0usize..64, -3i32..4).prop_map(|(i, d)| Op::Counter(i, d)),
        Just(Op::Shuffle),
        Just(Op::Reset),
        (-10i32..10).prop_map(Op::Life),
    ]
}

/// Pick a card id from a zone, or a bogus id if the zone is empty
fn pick(session: &GameSession, zone: ZoneKind, index: usize) -> CardId {
    let cards = session.zone(zone).cards();
    if cards.is_empty() {
        CardId::new("missing")
    } else {
        cards[index % cards.len()].id.clone()
    }
}

proptest! {
    #[test]
    fn prop_cards_are_conserved(ops in prop::collection::vec(op_strategy(), 1..60), seed in any::<u64>()) {
        let mut session = GameSession::new(None, &mut RandomCardIds::seeded(seed));
        let mut rng = StdRng::seed_from_u64(seed);
        let expected = id_multiset(&session);

        for op in ops {
            match op {
                Op::Draw(n) => {
                    let before = session.library().len();
                    let drawn = session.draw_cards(n);
                    prop_assert_eq!(drawn.len(), n.min(before));
                }
                Op::Move(from, to, i, pos) => {
                    let id = pick(&session, from, i);
                    let _ = session.move_card(&id, from, to, pos.map(|(x, y)| Position::new(x, y)));
                }
                Op::Top(from, i) => {
                    let id = pick(&session, from, i);
                    let _ = session.move_to_library_top(&id, from);
                }
                Op::Bottom(from, i) => {
                    let id = pick(&session, from, i);
                    let _ = session.move_to_library_bottom(&id, from);
                }
                Op::Tap(i) => {
                    let id = pick(&session, ZoneKind::Battlefield, i);
                    let _ = session.toggle_tap(&id);
                }
                Op::Counter(i, d) => {
                    let id = pick(&session, ZoneKind::Battlefield, i);
                    let _ = session.adjust_counter(&id, "+1/+1", d);
                }
                Op::Shuffle => session.shuffle_library(&mut rng),
                Op::Reset => session.reset(&mut rng),
                Op::Life(d) => {
                    session.adjust_life(d);
                }
            }

            prop_assert_eq!(id_multiset(&session), expected.clone());
            for (zone, card) in session.zones().iter() {
                if zone != ZoneKind::Battlefield {
                    prop_assert!(!card.tapped);
                    prop_assert_eq!(card.position, Position::ORIGIN);
                }
                prop_assert!((0.0..=100.0).contains(&card.position.x));
                prop_assert!((0.0..=100.0).contains(&card.position.y));
            }
        }
    }
}
