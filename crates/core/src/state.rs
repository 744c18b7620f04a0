use crate::{Card, Move, ScoreRanks, DECK_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const STOCK: &str = "stock";
pub const WASTE: &str = "waste";

pub fn tableau_id(index: usize) -> String {
    format!("t{index}")
}

pub fn foundation_id(index: usize) -> String {
    format!("f{index}")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PileKind {
    Tableau,
    Foundation,
    Stock,
    Waste,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pile {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PileKind,
    pub cards: Vec<Card>,
}

impl Pile {
    pub fn new(id: String, kind: PileKind) -> Self {
        Self {
            id,
            kind,
            cards: Vec::new(),
        }
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlindKind {
    Small,
    Big,
    Boss,
}

impl BlindKind {
    pub const ALL: [BlindKind; 3] = [BlindKind::Small, BlindKind::Big, BlindKind::Boss];

    pub fn index(self) -> usize {
        match self {
            BlindKind::Small => 0,
            BlindKind::Big => 1,
            BlindKind::Boss => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => BlindKind::Small,
            1 => BlindKind::Big,
            _ => BlindKind::Boss,
        }
    }
}

impl fmt::Display for BlindKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlindKind::Small => "small",
            BlindKind::Big => "big",
            BlindKind::Boss => "boss",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Standard,
    Daily,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundConfig {
    pub target_score: i64,
    pub time_limit_sec: i64,
    pub redeals: i64,
    pub deal_size: usize,
}

/// Partial override returned by round-start hooks; merged field by field.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundConfigPatch {
    pub target_score: Option<i64>,
    pub time_limit_sec: Option<i64>,
    pub redeals: Option<i64>,
    pub deal_size: Option<usize>,
}

impl RoundConfig {
    pub fn merge(self, patch: RoundConfigPatch) -> Self {
        Self {
            target_score: patch.target_score.unwrap_or(self.target_score),
            time_limit_sec: patch.time_limit_sec.unwrap_or(self.time_limit_sec),
            redeals: patch.redeals.unwrap_or(self.redeals),
            deal_size: patch.deal_size.unwrap_or(self.deal_size),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundStats {
    pub moves: u32,
    pub foundation_moves: u32,
    pub tableau_reveals: u32,
    pub columns_emptied: u32,
}

/// Everything an undo step restores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UndoSnapshot {
    pub piles: Vec<Pile>,
    pub score: i64,
    pub streak: u32,
    pub streak_multiplier: f64,
    pub redeals_left: i64,
    pub time_remaining_sec: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub config: RoundConfig,
    pub piles: Vec<Pile>,
    pub score: i64,
    pub streak: u32,
    pub streak_multiplier: f64,
    pub redeals_left: i64,
    pub time_remaining_sec: i64,
    pub move_history: Vec<Move>,
    pub undo_stack: Vec<UndoSnapshot>,
    #[serde(default)]
    pub stats: RoundStats,
    #[serde(default)]
    pub score_ranks: ScoreRanks,
    /// One King-on-same-colour-Queen placement while non-zero.
    #[serde(default)]
    pub royal_decree_charge: u32,
    /// First deal of the round also flips every tableau top.
    #[serde(default)]
    pub perfect_draw_pending: bool,
    /// Earned by emptying a column; spent doubling a foundation move.
    #[serde(default)]
    pub snap_charges: u32,
    #[serde(default)]
    pub double_next_charges: u32,
    /// Cards of the last dealt batch still on the waste.
    #[serde(default)]
    pub waste_group_remaining: usize,
    #[serde(default)]
    pub dealt_this_round: bool,
    #[serde(default)]
    pub tactician_available: bool,
    /// Clock value when play began; elapsed time is measured from it.
    #[serde(default)]
    pub started_with_sec: i64,
}

impl RoundState {
    pub fn new(config: RoundConfig, piles: Vec<Pile>) -> Self {
        Self {
            config,
            piles,
            score: 0,
            streak: 0,
            streak_multiplier: 1.0,
            redeals_left: config.redeals,
            time_remaining_sec: config.time_limit_sec,
            move_history: Vec::new(),
            undo_stack: Vec::new(),
            stats: RoundStats::default(),
            score_ranks: ScoreRanks::default(),
            royal_decree_charge: 0,
            perfect_draw_pending: false,
            snap_charges: 0,
            double_next_charges: 0,
            waste_group_remaining: 0,
            dealt_this_round: false,
            tactician_available: false,
            started_with_sec: config.time_limit_sec,
        }
    }

    pub fn pile(&self, id: &str) -> Option<&Pile> {
        self.piles.iter().find(|pile| pile.id == id)
    }

    pub fn pile_mut(&mut self, id: &str) -> Option<&mut Pile> {
        self.piles.iter_mut().find(|pile| pile.id == id)
    }

    pub fn piles_of(&self, kind: PileKind) -> impl Iterator<Item = &Pile> + '_ {
        self.piles.iter().filter(move |pile| pile.kind == kind)
    }

    pub fn stock_len(&self) -> usize {
        self.pile(STOCK).map_or(0, Pile::len)
    }

    pub fn waste_len(&self) -> usize {
        self.pile(WASTE).map_or(0, Pile::len)
    }

    /// Cards currently resting on foundations.
    pub fn foundation_count(&self) -> usize {
        self.piles_of(PileKind::Foundation).map(Pile::len).sum()
    }

    pub fn total_cards(&self) -> usize {
        self.piles.iter().map(Pile::len).sum()
    }

    pub fn is_perfect_clear(&self) -> bool {
        self.foundation_count() == DECK_SIZE
    }

    pub fn elapsed_sec(&self) -> i64 {
        self.started_with_sec - self.time_remaining_sec
    }

    pub fn snapshot(&self) -> UndoSnapshot {
        UndoSnapshot {
            piles: self.piles.clone(),
            score: self.score,
            streak: self.streak,
            streak_multiplier: self.streak_multiplier,
            redeals_left: self.redeals_left,
            time_remaining_sec: self.time_remaining_sec,
        }
    }

    pub fn restore(&mut self, snapshot: UndoSnapshot) {
        self.piles = snapshot.piles;
        self.score = snapshot.score;
        self.streak = snapshot.streak;
        self.streak_multiplier = snapshot.streak_multiplier;
        self.redeals_left = snapshot.redeals_left;
        self.time_remaining_sec = snapshot.time_remaining_sec;
    }

    /// Face-up every tableau top; returns how many flipped.
    pub fn reveal_tableau_tops(&mut self) -> usize {
        let mut flipped = 0;
        for pile in self
            .piles
            .iter_mut()
            .filter(|pile| pile.kind == PileKind::Tableau)
        {
            if let Some(top) = pile.cards.last_mut() {
                if !top.face_up {
                    top.face_up = true;
                    flipped += 1;
                }
            }
        }
        flipped
    }
}
