use crate::{
    round_half_up, Move, MoveExtras, RoundConfig, RoundConfigPatch, RoundState, ScoreBreakdown,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JokerRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl JokerRarity {
    pub const ALL: [JokerRarity; 4] = [
        JokerRarity::Common,
        JokerRarity::Uncommon,
        JokerRarity::Rare,
        JokerRarity::Legendary,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JokerVariant {
    Foil,
    Holo,
}

impl JokerVariant {
    pub fn multiplier(variant: Option<JokerVariant>) -> f64 {
        match variant {
            Some(JokerVariant::Foil) => 1.25,
            Some(JokerVariant::Holo) => 1.5,
            None => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JokerVariant::Foil => "Foil",
            JokerVariant::Holo => "Holo",
        }
    }
}

/// Run facts visible to joker hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokerContext {
    pub ante: u32,
    pub seed: String,
}

impl Default for JokerContext {
    fn default() -> Self {
        Self {
            ante: 1,
            seed: "dev".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub score: i64,
    pub time_remaining_sec: i64,
    pub foundation_count: usize,
    pub stock_left: usize,
    pub reveals: u32,
    pub dealt_this_round: bool,
}

impl RoundSummary {
    pub fn of(round: &RoundState) -> Self {
        Self {
            score: round.score,
            time_remaining_sec: round.time_remaining_sec,
            foundation_count: round.foundation_count(),
            stock_left: round.stock_len(),
            reveals: round.stats.tableau_reveals,
            dealt_this_round: round.dealt_this_round,
        }
    }
}

/// A boss refusing a move the rules allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Veto {
    pub reason: String,
}

impl Veto {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for Veto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Lifecycle hooks of an equipped joker. Every method defaults to "no effect".
pub trait JokerHooks: Send + Sync {
    fn on_round_start(
        &self,
        _ctx: &JokerContext,
        _current: &RoundConfig,
    ) -> Option<RoundConfigPatch> {
        None
    }

    /// Per-round flags granted by holding the joker.
    fn prepare_round(&self, _round: &mut RoundState) {}

    /// Returns a replacement for the running delta.
    fn on_move(
        &self,
        _mv: &Move,
        _delta: f64,
        _ctx: &JokerContext,
        _extras: &MoveExtras,
    ) -> Option<f64> {
        None
    }

    /// Called after a tableau-to-tableau move empties a column.
    fn on_column_emptied(&self, _round: &mut RoundState) {}

    /// Whether snap charges double the next foundation move.
    fn spends_snap_charges(&self) -> bool {
        false
    }

    /// Additive score adjustment at round close.
    fn on_round_end(&self, _summary: &RoundSummary, _ctx: &JokerContext) -> Option<f64> {
        None
    }
}

pub trait BossHooks: Send + Sync {
    fn on_round_start(&self, config: RoundConfig) -> RoundConfig {
        config
    }

    fn on_before_move(&self, _mv: &Move, _state: &RoundState) -> Option<Veto> {
        None
    }

    fn on_score(
        &self,
        _delta: f64,
        _state: &RoundState,
        _mv: &Move,
        _extras: &MoveExtras,
        _breakdown: &ScoreBreakdown,
    ) -> Option<f64> {
        None
    }

    /// Returns a replacement for `next`.
    fn on_after_move(
        &self,
        _prev: &RoundState,
        _next: &RoundState,
        _mv: &Move,
    ) -> Option<RoundState> {
        None
    }
}

#[derive(Clone)]
pub struct JokerDef {
    pub id: String,
    pub name: String,
    pub rarity: JokerRarity,
    pub description: String,
    pub hooks: Arc<dyn JokerHooks>,
}

impl fmt::Debug for JokerDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JokerDef")
            .field("id", &self.id)
            .field("rarity", &self.rarity)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct BossDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub hooks: Arc<dyn BossHooks>,
}

impl fmt::Debug for BossDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BossDef")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A registry joker as equipped in a run.
#[derive(Debug, Clone)]
pub struct ActiveJoker {
    pub def: JokerDef,
    pub variant: Option<JokerVariant>,
}

impl ActiveJoker {
    pub fn new(def: JokerDef, variant: Option<JokerVariant>) -> Self {
        Self { def, variant }
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn variant_multiplier(&self) -> f64 {
        JokerVariant::multiplier(self.variant)
    }
}

pub fn apply_joker_round_start(
    jokers: &[ActiveJoker],
    ctx: &JokerContext,
    config: RoundConfig,
) -> RoundConfig {
    jokers.iter().fold(config, |acc, joker| {
        match joker.def.hooks.on_round_start(ctx, &acc) {
            Some(patch) => acc.merge(patch),
            None => acc,
        }
    })
}

pub fn prepare_joker_round(jokers: &[ActiveJoker], round: &mut RoundState) {
    for joker in jokers {
        joker.def.hooks.prepare_round(round);
    }
}

/// Sum of round-end adjustments, each scaled by its joker's variant.
pub fn joker_round_end_adjustment(
    jokers: &[ActiveJoker],
    summary: &RoundSummary,
    ctx: &JokerContext,
) -> i64 {
    jokers
        .iter()
        .filter_map(|joker| {
            joker
                .def
                .hooks
                .on_round_end(summary, ctx)
                .filter(|value| value.is_finite())
                .map(|value| round_half_up(value * joker.variant_multiplier()) as i64)
        })
        .sum()
}

pub fn apply_boss_round_start(bosses: &[BossDef], config: RoundConfig) -> RoundConfig {
    bosses
        .iter()
        .fold(config, |acc, boss| boss.hooks.on_round_start(acc))
}

/// First veto wins.
pub fn boss_veto(bosses: &[BossDef], mv: &Move, state: &RoundState) -> Option<Veto> {
    bosses
        .iter()
        .find_map(|boss| boss.hooks.on_before_move(mv, state))
}

pub fn apply_boss_on_score(
    bosses: &[BossDef],
    delta: i64,
    state: &RoundState,
    mv: &Move,
    extras: &MoveExtras,
    breakdown: &ScoreBreakdown,
) -> i64 {
    let folded = bosses.iter().fold(delta as f64, |acc, boss| {
        boss.hooks
            .on_score(acc, state, mv, extras, breakdown)
            .unwrap_or(acc)
    });
    round_half_up(folded) as i64
}

pub fn apply_boss_after_move(
    bosses: &[BossDef],
    prev: &RoundState,
    next: RoundState,
    mv: &Move,
) -> RoundState {
    bosses.iter().fold(next, |acc, boss| {
        boss.hooks.on_after_move(prev, &acc, mv).unwrap_or(acc)
    })
}
