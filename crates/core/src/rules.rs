use crate::{
    can_place_on_foundation, can_stack_tableau, foundation_id, tableau_id, Card, PileKind,
    RoundState, FOUNDATIONS, KING, QUEEN, STOCK, TABLEAU_COLUMNS, WASTE,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    TableauToTableau,
    TableauToFoundation,
    WasteToTableau,
    WasteToFoundation,
    DealStock,
    Undo,
}

impl MoveKind {
    pub fn is_foundation(self) -> bool {
        matches!(self, MoveKind::TableauToFoundation | MoveKind::WasteToFoundation)
    }

    pub fn from_waste(self) -> bool {
        matches!(self, MoveKind::WasteToTableau | MoveKind::WasteToFoundation)
    }

    fn needs_piles(self) -> bool {
        !matches!(self, MoveKind::DealStock | MoveKind::Undo)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub kind: MoveKind,
    #[serde(rename = "fromPileId", default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "toPileId", default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl Move {
    fn between(kind: MoveKind, from: &str, to: &str) -> Self {
        Self {
            kind,
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            count: None,
        }
    }

    pub fn tableau_to_tableau(from: &str, to: &str, count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::between(MoveKind::TableauToTableau, from, to)
        }
    }

    pub fn tableau_to_foundation(from: &str, to: &str) -> Self {
        Self::between(MoveKind::TableauToFoundation, from, to)
    }

    pub fn waste_to_tableau(to: &str) -> Self {
        Self::between(MoveKind::WasteToTableau, WASTE, to)
    }

    pub fn waste_to_foundation(to: &str) -> Self {
        Self::between(MoveKind::WasteToFoundation, WASTE, to)
    }

    pub fn deal_stock() -> Self {
        Self {
            kind: MoveKind::DealStock,
            from: None,
            to: None,
            count: None,
        }
    }

    pub fn undo() -> Self {
        Self {
            kind: MoveKind::Undo,
            ..Self::deal_stock()
        }
    }

    /// Run length; absent means a single card.
    pub fn run_len(&self) -> usize {
        match self.kind {
            MoveKind::TableauToTableau => self.count.unwrap_or(1),
            _ => 1,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::DealStock => f.write_str("deal"),
            MoveKind::Undo => f.write_str("undo"),
            MoveKind::TableauToTableau => write!(
                f,
                "{} -> {} x{}",
                self.from.as_deref().unwrap_or("?"),
                self.to.as_deref().unwrap_or("?"),
                self.run_len()
            ),
            _ => write!(
                f,
                "{} -> {}",
                self.from.as_deref().unwrap_or("?"),
                self.to.as_deref().unwrap_or("?")
            ),
        }
    }
}

/// Why a move breaks the rules of the game. `Display` renders [`IllegalMove::code`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Error)]
#[serde(rename_all = "snake_case")]
pub enum IllegalMove {
    MissingPile,
    WrongPileType,
    EmptyFrom,
    InvalidCount,
    NotEnoughCards,
    FaceDownInRun,
    RunSequenceInvalid,
    NeedKingOnEmpty,
    CannotStack,
    NoFaceupTop,
    BadFoundation,
    EmptyWaste,
    MissingStock,
    NoRedeals,
    NoUndo,
}

impl IllegalMove {
    pub fn code(self) -> &'static str {
        match self {
            IllegalMove::MissingPile => "missing_pile",
            IllegalMove::WrongPileType => "wrong_pile_type",
            IllegalMove::EmptyFrom => "empty_from",
            IllegalMove::InvalidCount => "invalid_count",
            IllegalMove::NotEnoughCards => "not_enough_cards",
            IllegalMove::FaceDownInRun => "face_down_in_run",
            IllegalMove::RunSequenceInvalid => "run_sequence_invalid",
            IllegalMove::NeedKingOnEmpty => "need_king_on_empty",
            IllegalMove::CannotStack => "cannot_stack",
            IllegalMove::NoFaceupTop => "no_faceup_top",
            IllegalMove::BadFoundation => "bad_foundation",
            IllegalMove::EmptyWaste => "empty_waste",
            IllegalMove::MissingStock => "missing_stock",
            IllegalMove::NoRedeals => "no_redeals",
            IllegalMove::NoUndo => "no_undo",
        }
    }
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// King landing on a same-colour Queen while a decree charge is held.
pub fn royal_decree_applies(state: &RoundState, bottom: &Card, dest_top: &Card) -> bool {
    state.royal_decree_charge > 0
        && bottom.rank == KING
        && dest_top.rank == QUEEN
        && bottom.is_red() == dest_top.is_red()
}

pub fn is_legal_move(state: &RoundState, mv: &Move) -> Result<(), IllegalMove> {
    let from = mv.from.as_deref().and_then(|id| state.pile(id));
    let to = mv.to.as_deref().and_then(|id| state.pile(id));
    if mv.kind.needs_piles() && (from.is_none() || to.is_none()) {
        return Err(IllegalMove::MissingPile);
    }

    match mv.kind {
        MoveKind::TableauToTableau => {
            let (from, to) = from.zip(to).ok_or(IllegalMove::MissingPile)?;
            if from.kind != PileKind::Tableau || to.kind != PileKind::Tableau {
                return Err(IllegalMove::WrongPileType);
            }
            if from.is_empty() {
                return Err(IllegalMove::EmptyFrom);
            }
            let count = mv.run_len();
            if count == 0 {
                return Err(IllegalMove::InvalidCount);
            }
            if from.len() < count {
                return Err(IllegalMove::NotEnoughCards);
            }
            let moving = &from.cards[from.len() - count..];
            if moving.iter().any(|card| !card.face_up) {
                return Err(IllegalMove::FaceDownInRun);
            }
            if moving
                .windows(2)
                .any(|pair| !can_stack_tableau(&pair[1], &pair[0]))
            {
                return Err(IllegalMove::RunSequenceInvalid);
            }
            let bottom = &moving[0];
            match to.top() {
                None if bottom.rank == KING => Ok(()),
                None => Err(IllegalMove::NeedKingOnEmpty),
                Some(dest) => {
                    if can_stack_tableau(bottom, dest) || royal_decree_applies(state, bottom, dest)
                    {
                        Ok(())
                    } else {
                        Err(IllegalMove::CannotStack)
                    }
                }
            }
        }
        MoveKind::TableauToFoundation => {
            let (from, to) = from.zip(to).ok_or(IllegalMove::MissingPile)?;
            if from.kind != PileKind::Tableau || to.kind != PileKind::Foundation {
                return Err(IllegalMove::WrongPileType);
            }
            let top = from
                .top()
                .filter(|card| card.face_up)
                .ok_or(IllegalMove::NoFaceupTop)?;
            if can_place_on_foundation(top, to.top()) {
                Ok(())
            } else {
                Err(IllegalMove::BadFoundation)
            }
        }
        MoveKind::WasteToTableau => {
            let (from, to) = from.zip(to).ok_or(IllegalMove::MissingPile)?;
            if from.kind != PileKind::Waste || to.kind != PileKind::Tableau {
                return Err(IllegalMove::WrongPileType);
            }
            let top = from.top().ok_or(IllegalMove::EmptyWaste)?;
            match to.top() {
                None if top.rank == KING => Ok(()),
                None => Err(IllegalMove::NeedKingOnEmpty),
                Some(dest) if can_stack_tableau(top, dest) => Ok(()),
                Some(_) => Err(IllegalMove::CannotStack),
            }
        }
        MoveKind::WasteToFoundation => {
            let (from, to) = from.zip(to).ok_or(IllegalMove::MissingPile)?;
            if from.kind != PileKind::Waste || to.kind != PileKind::Foundation {
                return Err(IllegalMove::WrongPileType);
            }
            let top = from.top().ok_or(IllegalMove::EmptyWaste)?;
            if can_place_on_foundation(top, to.top()) {
                Ok(())
            } else {
                Err(IllegalMove::BadFoundation)
            }
        }
        MoveKind::DealStock => {
            let stock = state.pile(STOCK).ok_or(IllegalMove::MissingStock)?;
            if stock.is_empty() && state.redeals_left <= 0 {
                Err(IllegalMove::NoRedeals)
            } else {
                Ok(())
            }
        }
        MoveKind::Undo => {
            if state.undo_stack.is_empty() {
                Err(IllegalMove::NoUndo)
            } else {
                Ok(())
            }
        }
    }
}

/// The card a move would pick up: the bottom of a tableau run, a tableau top,
/// or the waste top.
pub fn moving_card<'a>(state: &'a RoundState, mv: &Move) -> Option<&'a Card> {
    match mv.kind {
        MoveKind::TableauToTableau => {
            let from = state.pile(mv.from.as_deref()?)?;
            let idx = from.len().checked_sub(mv.run_len())?;
            from.cards.get(idx)
        }
        MoveKind::TableauToFoundation => state.pile(mv.from.as_deref()?)?.top(),
        MoveKind::WasteToTableau | MoveKind::WasteToFoundation => state.pile(WASTE)?.top(),
        MoveKind::DealStock | MoveKind::Undo => None,
    }
}

/// Every well-formed move over the standard layout, legal or not.
pub fn candidate_moves() -> Vec<Move> {
    let mut moves = Vec::new();
    for from in 0..TABLEAU_COLUMNS {
        let from_id = tableau_id(from);
        for f in 0..FOUNDATIONS {
            moves.push(Move::tableau_to_foundation(&from_id, &foundation_id(f)));
        }
        for to in (0..TABLEAU_COLUMNS).filter(|to| *to != from) {
            for count in 1..=13 {
                moves.push(Move::tableau_to_tableau(&from_id, &tableau_id(to), count));
            }
        }
    }
    for f in 0..FOUNDATIONS {
        moves.push(Move::waste_to_foundation(&foundation_id(f)));
    }
    for to in 0..TABLEAU_COLUMNS {
        moves.push(Move::waste_to_tableau(&tableau_id(to)));
    }
    moves.push(Move::deal_stock());
    moves.push(Move::undo());
    moves
}

pub fn legal_moves(state: &RoundState) -> Vec<Move> {
    candidate_moves()
        .into_iter()
        .filter(|mv| is_legal_move(state, mv).is_ok())
        .collect()
}
