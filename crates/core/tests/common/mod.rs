#![allow(dead_code)]

use supersolitaire_core::{
    foundation_id, tableau_id, Card, Pile, PileKind, RoundConfig, RoundState, Suit, FOUNDATIONS,
    STOCK, TABLEAU_COLUMNS, WASTE,
};

pub fn round_config() -> RoundConfig {
    RoundConfig {
        target_score: 500,
        time_limit_sec: 360,
        redeals: 2,
        deal_size: 3,
    }
}

pub fn up(id: u8, suit: Suit, rank: u8) -> Card {
    Card {
        face_up: true,
        ..Card::new(id, suit, rank)
    }
}

pub fn down(id: u8, suit: Suit, rank: u8) -> Card {
    Card::new(id, suit, rank)
}

/// Standard pile layout, all empty.
pub fn empty_board() -> RoundState {
    let mut piles = Vec::new();
    for col in 0..TABLEAU_COLUMNS {
        piles.push(Pile::new(tableau_id(col), PileKind::Tableau));
    }
    for f in 0..FOUNDATIONS {
        piles.push(Pile::new(foundation_id(f), PileKind::Foundation));
    }
    piles.push(Pile::new(STOCK.to_string(), PileKind::Stock));
    piles.push(Pile::new(WASTE.to_string(), PileKind::Waste));
    RoundState::new(round_config(), piles)
}

/// Empty layout with the given piles filled, bottom card first.
pub fn board(filled: Vec<(&str, Vec<Card>)>) -> RoundState {
    let mut state = empty_board();
    for (id, cards) in filled {
        if let Some(pile) = state.pile_mut(id) {
            pile.cards = cards;
        }
    }
    state
}

/// Past the glacial gate, as if `secs` of the clock were already spent.
pub fn with_elapsed(mut state: RoundState, secs: i64) -> RoundState {
    state.time_remaining_sec = state.started_with_sec - secs;
    state
}
