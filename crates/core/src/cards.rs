use serde::{Deserialize, Serialize};

pub const ACE: u8 = 1;
pub const JACK: u8 = 11;
pub const QUEEN: u8 = 12;
pub const KING: u8 = 13;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    pub fn is_black(self) -> bool {
        !self.is_red()
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u8,
    pub suit: Suit,
    pub rank: u8,
    pub face_up: bool,
}

impl Card {
    pub fn new(id: u8, suit: Suit, rank: u8) -> Self {
        Self {
            id,
            suit,
            rank,
            face_up: false,
        }
    }

    pub fn is_red(&self) -> bool {
        self.suit.is_red()
    }

    pub fn is_royal(&self) -> bool {
        self.rank == KING || self.rank == QUEEN
    }

    pub fn rank_label(&self) -> &'static str {
        match self.rank {
            1 => "A",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "10",
            11 => "J",
            12 => "Q",
            13 => "K",
            _ => "?",
        }
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.rank_label(), self.suit.symbol())
    }
}

/// `upper` may sit on `lower` in a tableau column.
pub fn can_stack_tableau(upper: &Card, lower: &Card) -> bool {
    upper.face_up
        && lower.face_up
        && upper.is_red() != lower.is_red()
        && upper.rank + 1 == lower.rank
}

pub fn can_place_on_foundation(card: &Card, top: Option<&Card>) -> bool {
    if !card.face_up {
        return false;
    }
    match top {
        None => card.rank == ACE,
        Some(top) => card.suit == top.suit && card.rank == top.rank + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up(suit: Suit, rank: u8) -> Card {
        Card {
            face_up: true,
            ..Card::new(0, suit, rank)
        }
    }

    #[test]
    fn stacking_needs_opposite_colours_and_descending_rank() {
        assert!(can_stack_tableau(&up(Suit::Hearts, 6), &up(Suit::Spades, 7)));
        assert!(!can_stack_tableau(&up(Suit::Clubs, 6), &up(Suit::Spades, 7)));
        assert!(!can_stack_tableau(&up(Suit::Hearts, 5), &up(Suit::Spades, 7)));
        let hidden = Card::new(1, Suit::Spades, 7);
        assert!(!can_stack_tableau(&up(Suit::Hearts, 6), &hidden));
    }

    #[test]
    fn foundation_starts_with_ace_and_follows_suit() {
        assert!(can_place_on_foundation(&up(Suit::Clubs, ACE), None));
        assert!(!can_place_on_foundation(&up(Suit::Clubs, 2), None));
        let base = up(Suit::Clubs, ACE);
        assert!(can_place_on_foundation(&up(Suit::Clubs, 2), Some(&base)));
        assert!(!can_place_on_foundation(&up(Suit::Spades, 2), Some(&base)));
        assert!(!can_place_on_foundation(&Card::new(3, Suit::Clubs, ACE), None));
    }
}
