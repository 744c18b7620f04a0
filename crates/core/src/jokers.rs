use crate::{
    JokerContext, JokerDef, JokerHooks, JokerRarity, Move, MoveExtras, MoveKind, RoundConfig,
    RoundConfigPatch, RoundState, RoundSummary, ACE,
};
use std::sync::Arc;

pub const EARLY_BIRD: &str = "early-bird";
pub const STREAK_FREAK: &str = "streak-freak";
pub const DEEP_CUT: &str = "deep-cut";
pub const MONOCHROME: &str = "monochrome";
pub const ROYAL_DECREE: &str = "royal-decree";
pub const PERFECT_DRAW: &str = "perfect-draw";
pub const ARCHIVIST: &str = "archivist";
pub const SNAP: &str = "snap";
pub const WASTE_NOT: &str = "waste-not";
pub const CASCADE: &str = "cascade";
pub const TEMPO: &str = "tempo";
pub const ACE_PILOT: &str = "ace-pilot";
pub const COLUMN_MARSHAL: &str = "column-marshal";
pub const OVERTIME: &str = "overtime";
pub const TACTICIAN: &str = "tactician";

struct EarlyBird;

impl JokerHooks for EarlyBird {
    fn on_round_end(&self, summary: &RoundSummary, _ctx: &JokerContext) -> Option<f64> {
        (summary.time_remaining_sec > 30).then(|| (summary.score as f64 * 0.15).round())
    }
}

struct StreakFreak;

impl JokerHooks for StreakFreak {
    fn on_move(
        &self,
        _mv: &Move,
        delta: f64,
        _ctx: &JokerContext,
        extras: &MoveExtras,
    ) -> Option<f64> {
        extras
            .foundation_move
            .then(|| delta * (1.0 + 0.1 * f64::from(extras.streak_step)))
    }
}

struct DeepCut;

impl JokerHooks for DeepCut {
    fn on_round_start(
        &self,
        _ctx: &JokerContext,
        current: &RoundConfig,
    ) -> Option<RoundConfigPatch> {
        Some(RoundConfigPatch {
            redeals: Some(current.redeals + 1),
            ..RoundConfigPatch::default()
        })
    }
}

struct Monochrome;

impl JokerHooks for Monochrome {
    fn on_move(
        &self,
        _mv: &Move,
        delta: f64,
        _ctx: &JokerContext,
        extras: &MoveExtras,
    ) -> Option<f64> {
        let black = extras.moved_card.is_some_and(|card| card.suit.is_black());
        (extras.foundation_move && black).then(|| delta * 1.2)
    }
}

struct RoyalDecree;

impl JokerHooks for RoyalDecree {
    fn prepare_round(&self, round: &mut RoundState) {
        round.royal_decree_charge = 1;
    }
}

struct PerfectDraw;

impl JokerHooks for PerfectDraw {
    fn prepare_round(&self, round: &mut RoundState) {
        round.perfect_draw_pending = true;
    }
}

struct Archivist;

impl JokerHooks for Archivist {
    fn on_round_end(&self, summary: &RoundSummary, _ctx: &JokerContext) -> Option<f64> {
        if summary.reveals == 0 {
            return Some(0.0);
        }
        let bonus = (0.05 * f64::from(summary.reveals)).min(2.0);
        Some((summary.score as f64 * bonus).round())
    }
}

struct Snap;

impl JokerHooks for Snap {
    fn spends_snap_charges(&self) -> bool {
        true
    }
}

struct WasteNot;

impl JokerHooks for WasteNot {
    fn on_round_end(&self, summary: &RoundSummary, _ctx: &JokerContext) -> Option<f64> {
        Some(summary.stock_left as f64 * 10.0)
    }
}

struct Cascade;

impl JokerHooks for Cascade {
    fn on_move(
        &self,
        mv: &Move,
        delta: f64,
        _ctx: &JokerContext,
        extras: &MoveExtras,
    ) -> Option<f64> {
        (mv.kind == MoveKind::TableauToTableau && extras.moved_run_count >= 4).then(|| delta + 80.0)
    }
}

struct Tempo;

impl JokerHooks for Tempo {
    fn on_round_end(&self, summary: &RoundSummary, _ctx: &JokerContext) -> Option<f64> {
        if summary.dealt_this_round {
            return Some(0.0);
        }
        Some((summary.time_remaining_sec.max(0) / 15) as f64 * 50.0)
    }
}

struct AcePilot;

impl JokerHooks for AcePilot {
    fn on_move(
        &self,
        _mv: &Move,
        delta: f64,
        _ctx: &JokerContext,
        extras: &MoveExtras,
    ) -> Option<f64> {
        let ace = extras.moved_card.is_some_and(|card| card.rank == ACE);
        (extras.foundation_move && ace).then(|| delta + 70.0)
    }
}

struct ColumnMarshal;

impl JokerHooks for ColumnMarshal {
    fn on_column_emptied(&self, round: &mut RoundState) {
        if round.stats.columns_emptied == 2 {
            round.redeals_left += 1;
        }
    }
}

struct Overtime;

impl JokerHooks for Overtime {
    fn on_round_start(
        &self,
        _ctx: &JokerContext,
        current: &RoundConfig,
    ) -> Option<RoundConfigPatch> {
        Some(RoundConfigPatch {
            time_limit_sec: Some(current.time_limit_sec + 30),
            ..RoundConfigPatch::default()
        })
    }

    fn on_round_end(&self, summary: &RoundSummary, _ctx: &JokerContext) -> Option<f64> {
        (summary.time_remaining_sec <= 0).then(|| (summary.score as f64 * 0.15).round())
    }
}

struct Tactician;

impl JokerHooks for Tactician {
    fn prepare_round(&self, round: &mut RoundState) {
        round.tactician_available = true;
    }
}

fn joker(
    id: &str,
    name: &str,
    rarity: JokerRarity,
    description: &str,
    hooks: Arc<dyn JokerHooks>,
) -> JokerDef {
    JokerDef {
        id: id.to_string(),
        name: name.to_string(),
        rarity,
        description: description.to_string(),
        hooks,
    }
}

/// Built-in jokers in registry order; shop weighting walks this order.
pub fn builtin_jokers() -> Vec<JokerDef> {
    use JokerRarity::*;
    vec![
        joker(
            EARLY_BIRD,
            "Early Bird",
            Common,
            "+15% score if the round ends with more than 30s left.",
            Arc::new(EarlyBird),
        ),
        joker(
            STREAK_FREAK,
            "Streak Freak",
            Uncommon,
            "Foundation moves gain +10% per streak step.",
            Arc::new(StreakFreak),
        ),
        joker(DEEP_CUT, "Deep Cut", Uncommon, "+1 redeal.", Arc::new(DeepCut)),
        joker(
            MONOCHROME,
            "Monochrome",
            Rare,
            "Black cards moved to foundations score +20%.",
            Arc::new(Monochrome),
        ),
        joker(
            ROYAL_DECREE,
            "Royal Decree",
            Rare,
            "Once per round a King may move onto a Queen of its own colour.",
            Arc::new(RoyalDecree),
        ),
        joker(
            PERFECT_DRAW,
            "Perfect Draw",
            Legendary,
            "The first deal of each round reveals the top of every tableau pile.",
            Arc::new(PerfectDraw),
        ),
        joker(
            ARCHIVIST,
            "Archivist",
            Common,
            "+5% score per hidden card revealed this round, up to +200%.",
            Arc::new(Archivist),
        ),
        joker(
            SNAP,
            "Snap",
            Uncommon,
            "Emptying a column makes the next foundation move score double.",
            Arc::new(Snap),
        ),
        joker(
            WASTE_NOT,
            "Waste Not",
            Common,
            "+10 points per card left in the stock at round end.",
            Arc::new(WasteNot),
        ),
        joker(
            CASCADE,
            "Cascade",
            Rare,
            "Moving a run of 4 or more cards grants +80.",
            Arc::new(Cascade),
        ),
        joker(
            TEMPO,
            "Tempo",
            Uncommon,
            "+50 per 15s left if the stock was never dealt.",
            Arc::new(Tempo),
        ),
        joker(
            ACE_PILOT,
            "Ace Pilot",
            Uncommon,
            "Aces to foundation grant +70.",
            Arc::new(AcePilot),
        ),
        joker(
            COLUMN_MARSHAL,
            "Column Marshal",
            Rare,
            "Emptying a second column grants +1 redeal.",
            Arc::new(ColumnMarshal),
        ),
        joker(
            OVERTIME,
            "Overtime",
            Legendary,
            "+30s time limit; +15% score if all time is used.",
            Arc::new(Overtime),
        ),
        joker(
            TACTICIAN,
            "Tactician",
            Rare,
            "One illegal move per round is forgiven.",
            Arc::new(Tactician),
        ),
    ]
}
