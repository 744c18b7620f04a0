use crate::{
    moving_card, round_half_up, BossDef, BossHooks, Difficulty, Move, MoveExtras, MoveKind,
    RoundConfig, RoundState, ScoreBreakdown, Suit, Veto, STOCK, WASTE,
};
use std::sync::Arc;

pub const NIGHT_MODE: &str = "night-mode";
pub const RED_ALERT: &str = "red-alert";
pub const STOIC_STOCK: &str = "stoic-stock";
pub const THIN_WASTE: &str = "thin-waste";
pub const GLACIAL_START: &str = "glacial-start";
pub const FROZEN_ROYALS: &str = "frozen-royals";
pub const SUIT_TAX_SPADES: &str = "suit-tax-spades";
pub const HALF_DECK: &str = "half-deck";
pub const MIRROR_MOVES: &str = "mirror-moves";

/// Selection bag; a boss round uses the entry picked by its ante.
pub const BOSS_BAG: [&str; 9] = [
    NIGHT_MODE,
    RED_ALERT,
    STOIC_STOCK,
    THIN_WASTE,
    GLACIAL_START,
    FROZEN_ROYALS,
    SUIT_TAX_SPADES,
    HALF_DECK,
    MIRROR_MOVES,
];

pub fn boss_id_for_ante(ante: u32) -> &'static str {
    let idx = ante.wrapping_mul(2_654_435_761) as usize % BOSS_BAG.len();
    BOSS_BAG[idx]
}

struct NightMode {
    target_mult: f64,
    score_mult: f64,
}

impl BossHooks for NightMode {
    fn on_round_start(&self, config: RoundConfig) -> RoundConfig {
        RoundConfig {
            target_score: (config.target_score as f64 * self.target_mult).round() as i64,
            ..config
        }
    }

    fn on_score(
        &self,
        delta: f64,
        _state: &RoundState,
        _mv: &Move,
        _extras: &MoveExtras,
        _breakdown: &ScoreBreakdown,
    ) -> Option<f64> {
        Some(round_half_up(delta * self.score_mult))
    }
}

struct RedAlert {
    factor: f64,
}

impl BossHooks for RedAlert {
    fn on_score(
        &self,
        delta: f64,
        _state: &RoundState,
        _mv: &Move,
        extras: &MoveExtras,
        _breakdown: &ScoreBreakdown,
    ) -> Option<f64> {
        let red = extras.moved_card.is_some_and(|card| card.is_red());
        red.then(|| delta * self.factor)
    }
}

struct StoicStock {
    penalty: f64,
}

impl BossHooks for StoicStock {
    fn on_score(
        &self,
        delta: f64,
        _state: &RoundState,
        mv: &Move,
        _extras: &MoveExtras,
        _breakdown: &ScoreBreakdown,
    ) -> Option<f64> {
        (mv.kind == MoveKind::DealStock).then(|| delta - self.penalty)
    }
}

struct ThinWaste;

impl BossHooks for ThinWaste {
    fn on_before_move(&self, mv: &Move, state: &RoundState) -> Option<Veto> {
        let blocked = mv.kind == MoveKind::DealStock
            && state.pile(WASTE).is_some_and(|waste| !waste.is_empty());
        blocked.then(|| Veto::new("thin_waste_block"))
    }
}

struct GlacialStart;

impl BossHooks for GlacialStart {
    fn on_before_move(&self, mv: &Move, state: &RoundState) -> Option<Veto> {
        (mv.kind.is_foundation() && state.elapsed_sec() < 10).then(|| Veto::new("glacial_gate"))
    }
}

struct FrozenRoyals;

impl BossHooks for FrozenRoyals {
    fn on_before_move(&self, mv: &Move, state: &RoundState) -> Option<Veto> {
        if state.move_history.len() >= 5 {
            return None;
        }
        moving_card(state, mv)
            .filter(|card| card.is_royal())
            .map(|_| Veto::new("frozen_royals"))
    }
}

struct SuitTaxSpades;

impl BossHooks for SuitTaxSpades {
    fn on_score(
        &self,
        delta: f64,
        _state: &RoundState,
        _mv: &Move,
        extras: &MoveExtras,
        breakdown: &ScoreBreakdown,
    ) -> Option<f64> {
        let spade = extras.moved_card.is_some_and(|card| card.suit == Suit::Spades);
        (extras.foundation_move && spade).then(|| (delta - breakdown.foundation).max(0.0))
    }
}

struct HalfDeck;

impl BossHooks for HalfDeck {
    fn on_round_start(&self, config: RoundConfig) -> RoundConfig {
        RoundConfig {
            target_score: (config.target_score as f64 * 0.9).round() as i64,
            ..config
        }
    }

    fn on_after_move(
        &self,
        prev: &RoundState,
        next: &RoundState,
        _mv: &Move,
    ) -> Option<RoundState> {
        if !prev.move_history.is_empty() || next.stock_len() == 0 {
            return None;
        }
        let mut halved = next.clone();
        if let Some(stock) = halved.pile_mut(STOCK) {
            let keep_from = stock.len().div_ceil(2);
            stock.cards.drain(..keep_from);
        }
        Some(halved)
    }
}

struct MirrorMoves;

impl BossHooks for MirrorMoves {
    fn on_after_move(&self, prev: &RoundState, next: &RoundState, mv: &Move) -> Option<RoundState> {
        if next.move_history.len() % 5 != 0 || mv.kind.is_foundation() {
            return None;
        }
        let mut mirrored = next.clone();
        let last = mirrored.undo_stack.pop()?;
        mirrored.restore(last);
        mirrored.move_history = prev.move_history.clone();
        Some(mirrored)
    }
}

fn boss(id: &str, name: &str, description: &str, hooks: Arc<dyn BossHooks>) -> BossDef {
    BossDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        hooks,
    }
}

fn night_mode(target_mult: f64, score_mult: f64) -> Arc<dyn BossHooks> {
    Arc::new(NightMode {
        target_mult,
        score_mult,
    })
}

pub fn builtin_bosses() -> Vec<BossDef> {
    vec![
        boss(
            RED_ALERT,
            "Red Alert",
            "Red cards score -20% this round.",
            Arc::new(RedAlert { factor: 0.8 }),
        ),
        boss(
            STOIC_STOCK,
            "Stoic Stock",
            "Dealing from stock costs 25 points.",
            Arc::new(StoicStock { penalty: 25.0 }),
        ),
        boss(
            THIN_WASTE,
            "Thin Waste",
            "The stock cannot be dealt while the waste holds cards.",
            Arc::new(ThinWaste),
        ),
        boss(NIGHT_MODE, "Night Mode", "+10% target score and +10% points.", night_mode(1.1, 1.1)),
        boss(
            GLACIAL_START,
            "Glacial Start",
            "No foundation moves during the first 10s.",
            Arc::new(GlacialStart),
        ),
        boss(
            SUIT_TAX_SPADES,
            "Suit Tax: Spades",
            "Spades moved to a foundation score no foundation points.",
            Arc::new(SuitTaxSpades),
        ),
        boss(
            FROZEN_ROYALS,
            "Frozen Royals",
            "Kings and Queens cannot move during the first 5 moves.",
            Arc::new(FrozenRoyals),
        ),
        boss(
            HALF_DECK,
            "Half-Deck",
            "Only half the stock is available this round; target -10%.",
            Arc::new(HalfDeck),
        ),
        boss(
            MIRROR_MOVES,
            "Mirror Moves",
            "Every 5th move is reverted unless it reaches a foundation.",
            Arc::new(MirrorMoves),
        ),
    ]
}

/// Rebinds the hooks of bosses that have difficulty variants. Medium and
/// unscaled bosses pass through as-is.
pub fn scale_bosses_for_difficulty(bosses: &[BossDef], difficulty: Difficulty) -> Vec<BossDef> {
    let easy = difficulty == Difficulty::Easy;
    bosses
        .iter()
        .map(|def| {
            if difficulty == Difficulty::Medium {
                return def.clone();
            }
            let hooks: Arc<dyn BossHooks> = match def.id.as_str() {
                RED_ALERT => Arc::new(RedAlert {
                    factor: if easy { 0.9 } else { 0.7 },
                }),
                STOIC_STOCK => Arc::new(StoicStock {
                    penalty: if easy { 15.0 } else { 40.0 },
                }),
                NIGHT_MODE if easy => night_mode(1.05, 1.05),
                NIGHT_MODE => night_mode(1.2, 1.15),
                _ => return def.clone(),
            };
            BossDef {
                hooks,
                ..def.clone()
            }
        })
        .collect()
}
