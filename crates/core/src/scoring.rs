use crate::{ActiveJoker, Card, JokerContext, Move, PileKind, RoundState, DECK_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rounds halves toward positive infinity, so `-2.5` lands on `-2`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    FoundationMove,
    RevealFaceDown,
    EmptyColumn,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 3] = [
        ScoreCategory::FoundationMove,
        ScoreCategory::RevealFaceDown,
        ScoreCategory::EmptyColumn,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ScoreCategory::FoundationMove => "foundation_move",
            ScoreCategory::RevealFaceDown => "reveal_face_down",
            ScoreCategory::EmptyColumn => "empty_column",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.id() == id)
    }

    pub fn patron_title(self) -> &'static str {
        match self {
            ScoreCategory::FoundationMove => "Patron of Pillars",
            ScoreCategory::RevealFaceDown => "Keeper of Secrets",
            ScoreCategory::EmptyColumn => "Warden of the Void",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

fn rank_one() -> f64 {
    1.0
}

/// Permanent per-category multipliers, 1.0 at the start of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreRanks {
    #[serde(default = "rank_one")]
    pub foundation_move: f64,
    #[serde(default = "rank_one")]
    pub reveal_face_down: f64,
    #[serde(default = "rank_one")]
    pub empty_column: f64,
}

impl Default for ScoreRanks {
    fn default() -> Self {
        Self {
            foundation_move: 1.0,
            reveal_face_down: 1.0,
            empty_column: 1.0,
        }
    }
}

impl ScoreRanks {
    pub fn get(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::FoundationMove => self.foundation_move,
            ScoreCategory::RevealFaceDown => self.reveal_face_down,
            ScoreCategory::EmptyColumn => self.empty_column,
        }
    }

    fn slot(&mut self, category: ScoreCategory) -> &mut f64 {
        match category {
            ScoreCategory::FoundationMove => &mut self.foundation_move,
            ScoreCategory::RevealFaceDown => &mut self.reveal_face_down,
            ScoreCategory::EmptyColumn => &mut self.empty_column,
        }
    }

    /// Adds `step` and snaps to one decimal; returns the new value.
    pub fn bump(&mut self, category: ScoreCategory, step: f64) -> f64 {
        let slot = self.slot(category);
        *slot = ((*slot + step) * 10.0).round() / 10.0;
        *slot
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiminishingConfig {
    pub foundation_threshold: usize,
    pub foundation_decay: f64,
}

impl DiminishingConfig {
    pub const DEFAULT: DiminishingConfig = DiminishingConfig {
        foundation_threshold: 16,
        foundation_decay: 0.92,
    };

    /// Factor for a foundation move preceded by `prev_foundation_moves` others.
    pub fn factor(&self, prev_foundation_moves: usize) -> f64 {
        if prev_foundation_moves < self.foundation_threshold {
            return 1.0;
        }
        let excess = prev_foundation_moves - self.foundation_threshold + 1;
        self.foundation_decay.powi(excess as i32)
    }
}

impl Default for DiminishingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    pub foundation_points: f64,
    pub reveal_points: f64,
    pub empty_column_points: f64,
    pub streak_growth: f64,
    pub diminishing: DiminishingConfig,
}

impl ScoringRules {
    pub const DEFAULT: ScoringRules = ScoringRules {
        foundation_points: 50.0,
        reveal_points: 30.0,
        empty_column_points: 200.0,
        streak_growth: 1.2,
        diminishing: DiminishingConfig::DEFAULT,
    };
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub foundation: f64,
    pub reveal: f64,
    pub empty_column: f64,
}

/// Facts about a move handed to joker and boss score hooks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveExtras {
    pub foundation_move: bool,
    pub moved_card: Option<Card>,
    pub reveal_count: u32,
    pub moved_run_count: usize,
    pub streak_step: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveScore {
    pub delta: i64,
    pub breakdown: ScoreBreakdown,
    pub extras: MoveExtras,
    pub next_streak: u32,
    pub next_multiplier: f64,
}

pub fn count_foundation_moves(history: &[Move]) -> usize {
    history.iter().filter(|mv| mv.kind.is_foundation()).count()
}

/// Progress towards diminishing returns for a round in play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiminishingStatus {
    pub factor: f64,
    pub active: bool,
    pub prev_foundation_moves: usize,
    pub threshold: usize,
}

pub fn diminishing_status(round: &RoundState, config: &DiminishingConfig) -> DiminishingStatus {
    let prev = count_foundation_moves(&round.move_history);
    DiminishingStatus {
        factor: config.factor(prev),
        active: prev >= config.foundation_threshold,
        prev_foundation_moves: prev,
        threshold: config.foundation_threshold,
    }
}

/// Whether the source column's new top was turned face-up by this move.
fn revealed_source_top(prev: &RoundState, next: &RoundState, from_id: &str) -> bool {
    let (Some(prev_from), Some(next_from)) = (prev.pile(from_id), next.pile(from_id)) else {
        return false;
    };
    if prev_from.kind != PileKind::Tableau {
        return false;
    }
    let Some(next_top) = next_from.top().filter(|card| card.face_up) else {
        return false;
    };
    prev_from
        .cards
        .iter()
        .find(|card| card.id == next_top.id)
        .is_some_and(|before| !before.face_up)
}

fn emptied_source(prev: &RoundState, next: &RoundState, from_id: &str) -> bool {
    match (prev.pile(from_id), next.pile(from_id)) {
        (Some(prev_from), Some(next_from)) => {
            prev_from.kind == PileKind::Tableau && !prev_from.is_empty() && next_from.is_empty()
        }
        _ => false,
    }
}

pub fn compute_move_score(
    prev: &RoundState,
    next: &RoundState,
    mv: &Move,
    jokers: &[ActiveJoker],
    ctx: &JokerContext,
    rules: &ScoringRules,
) -> MoveScore {
    let ranks = next.score_ranks;
    let foundation_move = mv.kind.is_foundation();

    let foundation = if foundation_move {
        let diminish = rules
            .diminishing
            .factor(count_foundation_moves(&prev.move_history));
        rules.foundation_points
            * prev.streak_multiplier
            * diminish
            * ranks.get(ScoreCategory::FoundationMove)
    } else {
        0.0
    };

    let from_id = mv.from.as_deref().unwrap_or_default();
    let reveal = if revealed_source_top(prev, next, from_id) {
        rules.reveal_points * ranks.get(ScoreCategory::RevealFaceDown)
    } else {
        0.0
    };
    let empty_column = if emptied_source(prev, next, from_id) {
        rules.empty_column_points * ranks.get(ScoreCategory::EmptyColumn)
    } else {
        0.0
    };

    let extras = MoveExtras {
        foundation_move,
        moved_card: mv
            .to
            .as_deref()
            .and_then(|id| next.pile(id))
            .and_then(|pile| pile.top().copied()),
        reveal_count: u32::from(reveal > 0.0),
        moved_run_count: mv.run_len(),
        streak_step: if foundation_move { prev.streak + 1 } else { 0 },
    };

    let mut delta = round_half_up(foundation + reveal + empty_column);
    for joker in jokers {
        if let Some(changed) = joker.def.hooks.on_move(mv, delta, ctx, &extras) {
            if changed.is_finite() {
                delta = round_half_up(changed * joker.variant_multiplier());
            }
        }
    }

    let (next_streak, next_multiplier) = if foundation_move {
        (prev.streak + 1, prev.streak_multiplier * rules.streak_growth)
    } else {
        (0, 1.0)
    };

    MoveScore {
        delta: delta as i64,
        breakdown: ScoreBreakdown {
            foundation: round_half_up(foundation),
            reveal,
            empty_column,
        },
        extras,
        next_streak,
        next_multiplier,
    }
}

/// End-of-round bonus weighted by foundation progress and time left.
pub fn compute_run_bonus(round: &RoundState) -> i64 {
    let foundation_pct = (round.foundation_count() as f64 / DECK_SIZE as f64).clamp(0.0, 1.0);
    let time_pct = if round.config.time_limit_sec > 0 {
        (round.time_remaining_sec as f64 / round.config.time_limit_sec as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((foundation_pct * 0.6 + time_pct * 0.4) * 300.0).round() as i64
}
