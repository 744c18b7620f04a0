mod common;

use common::{board, up};
use supersolitaire_core::{
    compute_run_bonus, diminishing_status, evaluate_round, forced_outcome, round_half_up,
    try_apply_move, ActiveJoker, BlindKind, Content, DiminishingConfig, GameConfig, JokerContext,
    JokerVariant, Move, MoveOptions, MoveResult, RoundState, ScoreCategory, ScoreRanks, Suit, ACE,
    ACE_PILOT, STREAK_FREAK, WASTE,
};

fn play(state: &RoundState, mv: Move, jokers: &[ActiveJoker]) -> RoundState {
    let opts = MoveOptions::new(jokers, &[]);
    match try_apply_move(state, &mv, &opts) {
        MoveResult::Applied(next) => next,
        other => panic!("{mv} was not applied: {other:?}"),
    }
}

fn ladder() -> RoundState {
    board(vec![(
        "t0",
        vec![
            up(4, Suit::Clubs, 9),
            up(3, Suit::Hearts, 3),
            up(2, Suit::Hearts, 2),
            up(1, Suit::Hearts, ACE),
        ],
    )])
}

fn joker(id: &str, variant: Option<JokerVariant>) -> ActiveJoker {
    let content = Content::builtin();
    ActiveJoker::new(content.joker_by_id(id).unwrap().clone(), variant)
}

#[test]
fn ace_from_waste_scores_fifty() {
    let state = board(vec![(WASTE, vec![up(1, Suit::Spades, ACE)])]);
    let next = play(&state, Move::waste_to_foundation("f0"), &[]);
    assert_eq!(next.score, 50);
    assert_eq!(next.streak, 1);
    assert!((next.streak_multiplier - 1.2).abs() < 1e-9);
}

#[test]
fn streak_compounds_over_foundation_moves() {
    let s1 = play(&ladder(), Move::tableau_to_foundation("t0", "f0"), &[]);
    let s2 = play(&s1, Move::tableau_to_foundation("t0", "f0"), &[]);
    assert!((s2.streak_multiplier - 1.44).abs() < 1e-9);
    assert_eq!(s2.score, 50 + 60);

    let s3 = play(&s2, Move::tableau_to_foundation("t0", "f0"), &[]);
    assert_eq!(s3.score - s2.score, 72);
    assert!((s3.streak_multiplier - 1.728).abs() < 1e-9);
    assert_eq!(s3.streak, 3);
}

#[test]
fn diminishing_returns_after_threshold() {
    let config = DiminishingConfig::DEFAULT;
    assert_eq!(config.factor(0), 1.0);
    assert_eq!(config.factor(15), 1.0);
    assert!((config.factor(16) - 0.92).abs() < 1e-12);
    assert!((config.factor(18) - 0.92f64.powi(3)).abs() < 1e-12);
}

#[test]
fn diminishing_status_counts_foundation_history() {
    let mut state = ladder();
    state.move_history = vec![Move::waste_to_foundation("f0"); 17];
    state.move_history.push(Move::deal_stock());
    let status = diminishing_status(&state, &DiminishingConfig::DEFAULT);
    assert_eq!(status.prev_foundation_moves, 17);
    assert!(status.active);
    assert!((status.factor - 0.92f64.powi(2)).abs() < 1e-12);
}

#[test]
fn diminished_foundation_move_scores_less() {
    let mut state = ladder();
    state.move_history = vec![Move::waste_to_foundation("f1"); 16];
    let next = play(&state, Move::tableau_to_foundation("t0", "f0"), &[]);
    assert_eq!(next.score, 46);
}

#[test]
fn rank_multiplies_its_category() {
    let mut state = ladder();
    let mut ranks = ScoreRanks::default();
    ranks.bump(ScoreCategory::FoundationMove, 0.5);
    state.score_ranks = ranks;
    let next = play(&state, Move::tableau_to_foundation("t0", "f0"), &[]);
    assert_eq!(next.score, 75);
}

#[test]
fn rank_bumps_snap_to_one_decimal() {
    let mut ranks = ScoreRanks::default();
    for _ in 0..3 {
        ranks.bump(ScoreCategory::EmptyColumn, 0.1);
    }
    assert_eq!(ranks.get(ScoreCategory::EmptyColumn), 1.3);
    assert_eq!(ranks.get(ScoreCategory::FoundationMove), 1.0);
}

#[test]
fn ace_pilot_adds_to_ace_foundations() {
    let jokers = [joker(ACE_PILOT, None)];
    let next = play(&ladder(), Move::tableau_to_foundation("t0", "f0"), &jokers);
    assert_eq!(next.score, 120);
    let two = play(&next, Move::tableau_to_foundation("t0", "f0"), &jokers);
    assert_eq!(two.score - next.score, 60);
}

#[test]
fn variant_scales_the_joker_result() {
    let jokers = [joker(ACE_PILOT, Some(JokerVariant::Holo))];
    let next = play(&ladder(), Move::tableau_to_foundation("t0", "f0"), &jokers);
    assert_eq!(next.score, 180);
}

#[test]
fn streak_freak_grows_with_streak() {
    let jokers = [joker(STREAK_FREAK, None)];
    let s1 = play(&ladder(), Move::tableau_to_foundation("t0", "f0"), &jokers);
    assert_eq!(s1.score, 55);
}

#[test]
fn halves_round_toward_positive_infinity() {
    assert_eq!(round_half_up(2.5), 3.0);
    assert_eq!(round_half_up(-2.5), -2.0);
    assert_eq!(round_half_up(-16.5), -16.0);
    assert_eq!(round_half_up(-2.6), -3.0);
    assert_eq!(round_half_up(4.4), 4.0);
}

#[test]
fn run_bonus_weighs_foundations_and_time() {
    let mut state = ladder();
    assert_eq!(compute_run_bonus(&state), 120);
    state.time_remaining_sec = 0;
    assert_eq!(compute_run_bonus(&state), 0);
}

#[test]
fn success_pays_at_least_the_blind_minimum() {
    let game = GameConfig::default();
    let mut state = ladder();
    state.score = 500;
    state.time_remaining_sec = 0;
    for (blind, floor) in [
        (BlindKind::Small, 8),
        (BlindKind::Big, 10),
        (BlindKind::Boss, 12),
    ] {
        let outcome = evaluate_round(&game, &state, blind).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.coins_breakdown.base, 5);
        assert_eq!(outcome.coins_earned, floor);
    }
}

#[test]
fn failure_pays_half_rate_without_floor() {
    let game = GameConfig::default();
    let mut state = ladder();
    state.score = 499;
    let outcome = evaluate_round(&game, &state, BlindKind::Boss).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.run_bonus, 0);
    assert_eq!(outcome.coins_earned, 2);
}

#[test]
fn big_success_earns_past_the_floor() {
    let game = GameConfig::default();
    let mut state = ladder();
    state.score = 2_000;
    let outcome = evaluate_round(&game, &state, BlindKind::Small).unwrap();
    assert_eq!(outcome.run_bonus, 120);
    assert_eq!(outcome.coins_breakdown.base, 20);
    assert_eq!(outcome.coins_breakdown.bonus, 2);
    assert_eq!(outcome.coins_earned, 22);
}

#[test]
fn forced_success_pays_share_of_target() {
    let game = GameConfig::default();
    let mut state = ladder();
    state.config.target_score = 625;
    let outcome = forced_outcome(&game, &state, BlindKind::Big);
    assert!(outcome.success);
    assert_eq!(outcome.coins_earned, 6);
}

#[test]
fn round_end_adjustment_recomputes_base_coins() {
    let game = GameConfig::default();
    let mut state = ladder();
    state.score = 900;
    state.time_remaining_sec = 0;
    let outcome = evaluate_round(&game, &state, BlindKind::Small).unwrap();
    let adjusted = outcome.adjusted(&game, 150);
    assert_eq!(adjusted.score, 1_050);
    assert_eq!(adjusted.coins_breakdown.base, 10);
    assert_eq!(adjusted.coins_earned, 10);
    assert_eq!(outcome.adjusted(&game, 0), outcome);
}

#[test]
fn joker_context_defaults_to_first_ante() {
    let ctx = JokerContext::default();
    assert_eq!(ctx.ante, 1);
}
