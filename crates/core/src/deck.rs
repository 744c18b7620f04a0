use crate::{
    foundation_id, tableau_id, Card, Pile, PileKind, RngState, RoundConfig, RoundState, Suit,
    STOCK, WASTE,
};

pub const TABLEAU_COLUMNS: usize = 7;
pub const FOUNDATIONS: usize = 4;
pub const DECK_SIZE: usize = 52;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Suit-major, ace to king, all face-down; ids follow that order.
    pub fn standard52() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in 1..=13u8 {
                cards.push(Card::new(cards.len() as u8, suit, rank));
            }
        }
        Self { cards }
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.cards);
    }

    pub fn shuffled(seed: &str) -> (Self, RngState) {
        let mut rng = RngState::new(seed);
        let mut deck = Self::standard52();
        deck.shuffle(&mut rng);
        (deck, rng)
    }
}

/// A fresh layout and the generator it consumed.
#[derive(Debug, Clone)]
pub struct Deal {
    pub state: RoundState,
    pub rng: RngState,
}

pub fn initial_klondike_deal(seed: &str, config: RoundConfig) -> Deal {
    let (deck, rng) = Deck::shuffled(seed);
    let mut cards = deck.cards.into_iter();

    let mut piles = Vec::with_capacity(TABLEAU_COLUMNS + FOUNDATIONS + 2);
    for col in 0..TABLEAU_COLUMNS {
        let mut pile = Pile::new(tableau_id(col), PileKind::Tableau);
        for n in 0..=col {
            if let Some(mut card) = cards.next() {
                card.face_up = n == col;
                pile.cards.push(card);
            }
        }
        piles.push(pile);
    }
    for f in 0..FOUNDATIONS {
        piles.push(Pile::new(foundation_id(f), PileKind::Foundation));
    }
    let mut stock = Pile::new(STOCK.to_string(), PileKind::Stock);
    stock.cards = cards
        .map(|mut card| {
            card.face_up = false;
            card
        })
        .collect();
    piles.push(stock);
    piles.push(Pile::new(WASTE.to_string(), PileKind::Waste));

    Deal {
        state: RoundState::new(config, piles),
        rng,
    }
}
