use crate::{
    apply_boss_round_start, apply_joker_round_start, compute_run_bonus, initial_klondike_deal,
    prepare_joker_round, scale_bosses_for_difficulty, tableau_id, ActiveJoker, BlindKind, BossDef,
    ConfigError, Deck, Difficulty, GameConfig, JokerContext, Pile, PileKind, RngState, RoundState,
    ScoreRanks, STOCK, TABLEAU_COLUMNS, WASTE,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Deal seed for one board of a run.
pub fn board_seed(seed: &str, ante: u32, blind: BlindKind) -> String {
    format!("{seed}-a{ante}-{blind}")
}

/// Everything a fresh board depends on besides the tuning tables.
#[derive(Debug, Clone, Copy)]
pub struct RoundSetup<'a> {
    /// Run seed; the deal itself uses [`board_seed`].
    pub seed: &'a str,
    pub ante: u32,
    pub blind: BlindKind,
    pub difficulty: Difficulty,
    pub bosses: &'a [BossDef],
    pub jokers: &'a [ActiveJoker],
    pub score_ranks: ScoreRanks,
}

/// Builds and deals a round. Config passes through the blind rule, boss
/// round-start hooks (boss blinds only), then joker round-start hooks before
/// the deal; the timer is then tightened per blind.
pub fn create_round(game: &GameConfig, setup: RoundSetup<'_>) -> Result<RoundState, ConfigError> {
    let rule = game.blind_rule(setup.blind)?;
    let mut config = game.round_config(setup.ante, setup.difficulty)?;
    config.target_score = (config.target_score as f64 * rule.target_mult).round() as i64;
    if setup.blind == BlindKind::Boss {
        let scaled = scale_bosses_for_difficulty(setup.bosses, setup.difficulty);
        config = apply_boss_round_start(&scaled, config);
    }
    let ctx = JokerContext {
        ante: setup.ante,
        seed: setup.seed.to_string(),
    };
    config = apply_joker_round_start(setup.jokers, &ctx, config);

    let deal_seed = board_seed(setup.seed, setup.ante, setup.blind);
    let mut state = initial_klondike_deal(&deal_seed, config).state;
    if rule.timer_mult != 1.0 {
        let tightened = (state.time_remaining_sec as f64 * rule.timer_mult).round() as i64;
        state.time_remaining_sec = tightened.max(game.timer_floor_sec);
    }
    state.started_with_sec = state.time_remaining_sec;
    state.score_ranks = setup.score_ranks;
    prepare_joker_round(setup.jokers, &mut state);

    info!(
        ante = setup.ante,
        blind = %setup.blind,
        target = state.config.target_score,
        time = state.time_remaining_sec,
        "round dealt"
    );
    Ok(state)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinsBreakdown {
    pub base: i64,
    pub bonus: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    pub blind: BlindKind,
    pub success: bool,
    pub score: i64,
    pub target: i64,
    pub coins_earned: i64,
    pub run_bonus: i64,
    pub coins_breakdown: CoinsBreakdown,
    pub perfect_clear: bool,
}

fn base_coins(game: &GameConfig, score: i64, success: bool) -> i64 {
    let divisor = if success {
        game.economy.success_coin_divisor
    } else {
        game.economy.failure_coin_divisor
    };
    score.max(0) / divisor.max(1)
}

pub fn evaluate_round(
    game: &GameConfig,
    state: &RoundState,
    blind: BlindKind,
) -> Result<RoundOutcome, ConfigError> {
    let rule = game.blind_rule(blind)?;
    let success = state.score >= state.config.target_score;
    let base = base_coins(game, state.score, success);
    let run_bonus = if success { compute_run_bonus(state) } else { 0 };
    let per_coin = game.economy.bonus_points_per_coin.max(1) as f64;
    let bonus_coins = (run_bonus as f64 / per_coin).round() as i64;
    let perfect_clear = state.is_perfect_clear();
    let perfect_coins = if perfect_clear {
        game.economy.perfect_clear_coins
    } else {
        0
    };
    let preliminary = base + bonus_coins + perfect_coins;
    let coins_earned = if success {
        preliminary.max(rule.min_coins)
    } else {
        preliminary
    };
    Ok(RoundOutcome {
        blind,
        success,
        score: state.score,
        target: state.config.target_score,
        coins_earned,
        run_bonus,
        coins_breakdown: CoinsBreakdown {
            base,
            bonus: bonus_coins + perfect_coins,
        },
        perfect_clear,
    })
}

/// A success declared without evaluation; pays a flat share of the target.
pub fn forced_outcome(game: &GameConfig, state: &RoundState, blind: BlindKind) -> RoundOutcome {
    let divisor = game.economy.success_coin_divisor.max(1) as f64;
    RoundOutcome {
        blind,
        success: true,
        score: state.score,
        target: state.config.target_score,
        coins_earned: (state.config.target_score as f64 / divisor).round() as i64,
        run_bonus: 0,
        coins_breakdown: CoinsBreakdown::default(),
        perfect_clear: state.is_perfect_clear(),
    }
}

impl RoundOutcome {
    /// Folds a round-end score adjustment in and recomputes the base coins.
    pub fn adjusted(self, game: &GameConfig, score_delta: i64) -> Self {
        if score_delta == 0 {
            return self;
        }
        let score = (self.score + score_delta).max(0);
        let base = base_coins(game, score, self.success);
        Self {
            score,
            coins_earned: base + self.coins_breakdown.bonus,
            coins_breakdown: CoinsBreakdown {
                base,
                bonus: self.coins_breakdown.bonus,
            },
            ..self
        }
    }
}

/// Reshuffles every card off the foundations into a fresh tableau and stock.
/// Costs one redeal; foundations stay as they are.
pub fn full_redeal(state: &RoundState, rng_seed: &str) -> RoundState {
    let mut pool = Deck::default();
    for pile in state.piles.iter().filter(|pile| pile.kind != PileKind::Foundation) {
        pool.cards.extend(pile.cards.iter().map(|card| {
            let mut card = *card;
            card.face_up = false;
            card
        }));
    }
    let mut rng = RngState::new(rng_seed);
    pool.shuffle(&mut rng);

    let mut cards = pool.cards.into_iter();
    let mut piles: Vec<Pile> = Vec::with_capacity(state.piles.len());
    for col in 0..TABLEAU_COLUMNS {
        let mut pile = Pile::new(tableau_id(col), PileKind::Tableau);
        pile.cards.extend(cards.by_ref().take(col + 1));
        if let Some(top) = pile.cards.last_mut() {
            top.face_up = true;
        }
        piles.push(pile);
    }
    piles.extend(
        state
            .piles
            .iter()
            .filter(|pile| pile.kind == PileKind::Foundation)
            .cloned(),
    );
    let mut stock = Pile::new(STOCK.to_string(), PileKind::Stock);
    stock.cards.extend(cards);
    piles.push(stock);
    piles.push(Pile::new(WASTE.to_string(), PileKind::Waste));

    let mut next = state.clone();
    next.piles = piles;
    next.redeals_left = (state.redeals_left - 1).max(0);
    next.waste_group_remaining = 0;
    next
}
