mod common;

use common::{board, down, round_config, up, with_elapsed};
use supersolitaire_core::*;

fn boss(id: &str) -> BossDef {
    Content::builtin().boss_by_id(id).unwrap().clone()
}

fn joker(id: &str) -> ActiveJoker {
    let content = Content::builtin();
    ActiveJoker::new(content.joker_by_id(id).unwrap().clone(), None)
}

fn run_move(
    state: &RoundState,
    mv: Move,
    jokers: &[ActiveJoker],
    bosses: &[BossDef],
) -> MoveResult {
    try_apply_move(state, &mv, &MoveOptions::new(jokers, bosses))
}

fn applied(result: MoveResult) -> RoundState {
    match result {
        MoveResult::Applied(state) => state,
        other => panic!("expected applied move, got {other:?}"),
    }
}

fn doubled_ace(suit: Suit) -> RoundState {
    let mut state = with_elapsed(
        board(vec![("t0", vec![up(9, Suit::Clubs, 9), up(1, suit, ACE)])]),
        30,
    );
    state.streak_multiplier = 2.0;
    state
}

#[test]
fn red_alert_cuts_red_cards() {
    let bosses = [boss(RED_ALERT)];
    let red = applied(run_move(
        &doubled_ace(Suit::Hearts),
        Move::tableau_to_foundation("t0", "f0"),
        &[],
        &bosses,
    ));
    assert_eq!(red.score, 80);
    let black = applied(run_move(
        &doubled_ace(Suit::Spades),
        Move::tableau_to_foundation("t0", "f0"),
        &[],
        &bosses,
    ));
    assert_eq!(black.score, 100);
}

#[test]
fn hard_red_alert_cuts_deeper() {
    let bosses = scale_bosses_for_difficulty(&[boss(RED_ALERT)], Difficulty::Hard);
    let next = applied(run_move(
        &doubled_ace(Suit::Diamonds),
        Move::tableau_to_foundation("t0", "f0"),
        &[],
        &bosses,
    ));
    assert_eq!(next.score, 70);

    let easy = scale_bosses_for_difficulty(&[boss(RED_ALERT)], Difficulty::Easy);
    let next = applied(run_move(
        &doubled_ace(Suit::Diamonds),
        Move::tableau_to_foundation("t0", "f0"),
        &[],
        &easy,
    ));
    assert_eq!(next.score, 90);
}

#[test]
fn night_mode_raises_target_and_points() {
    let bosses = [boss(NIGHT_MODE)];
    let config = apply_boss_round_start(&bosses, round_config());
    assert_eq!(config.target_score, 550);
    let next = applied(run_move(
        &doubled_ace(Suit::Spades),
        Move::tableau_to_foundation("t0", "f0"),
        &[],
        &bosses,
    ));
    assert_eq!(next.score, 110);

    let hard = scale_bosses_for_difficulty(&bosses, Difficulty::Hard);
    assert_eq!(apply_boss_round_start(&hard, round_config()).target_score, 600);
}

#[test]
fn stoic_stock_charges_for_deals() {
    let state = board(vec![(STOCK, vec![down(1, Suit::Clubs, 4)])]);
    let next = applied(run_move(&state, Move::deal_stock(), &[], &[boss(STOIC_STOCK)]));
    assert_eq!(next.score, -25);

    let easy = scale_bosses_for_difficulty(&[boss(STOIC_STOCK)], Difficulty::Easy);
    let next = applied(run_move(&state, Move::deal_stock(), &[], &easy));
    assert_eq!(next.score, -15);
}

#[test]
fn negative_half_points_round_up() {
    let state = board(vec![(STOCK, vec![down(1, Suit::Clubs, 4)])]);
    let mut bosses = scale_bosses_for_difficulty(&[boss(STOIC_STOCK)], Difficulty::Easy);
    bosses.push(boss(NIGHT_MODE));
    let next = applied(run_move(&state, Move::deal_stock(), &[], &bosses));
    assert_eq!(next.score, -16);
}

#[test]
fn thin_waste_blocks_deal_over_waste() {
    let state = board(vec![
        (STOCK, vec![down(1, Suit::Clubs, 4)]),
        (WASTE, vec![up(2, Suit::Hearts, 9)]),
    ]);
    let result = run_move(&state, Move::deal_stock(), &[], &[boss(THIN_WASTE)]);
    assert_eq!(result, MoveResult::Vetoed(Veto::new("thin_waste_block")));

    let clear = board(vec![(STOCK, vec![down(1, Suit::Clubs, 4)])]);
    assert!(run_move(&clear, Move::deal_stock(), &[], &[boss(THIN_WASTE)]).is_applied());
}

#[test]
fn glacial_start_gates_foundations() {
    let fresh = board(vec![("t0", vec![up(1, Suit::Hearts, ACE)])]);
    let bosses = [boss(GLACIAL_START)];
    let result = run_move(&fresh, Move::tableau_to_foundation("t0", "f0"), &[], &bosses);
    assert_eq!(result, MoveResult::Vetoed(Veto::new("glacial_gate")));

    let later = with_elapsed(fresh, 10);
    assert!(run_move(&later, Move::tableau_to_foundation("t0", "f0"), &[], &bosses).is_applied());
}

#[test]
fn veto_is_checked_before_legality() {
    let fresh = board(vec![("t0", vec![up(1, Suit::Hearts, 5)])]);
    let result = run_move(
        &fresh,
        Move::tableau_to_foundation("t0", "f0"),
        &[],
        &[boss(GLACIAL_START)],
    );
    assert!(matches!(result, MoveResult::Vetoed(_)));
}

#[test]
fn frozen_royals_hold_for_five_moves() {
    let mut state = board(vec![("t0", vec![up(1, Suit::Spades, KING)])]);
    let bosses = [boss(FROZEN_ROYALS)];
    let result = run_move(&state, Move::tableau_to_tableau("t0", "t1", 1), &[], &bosses);
    assert_eq!(result, MoveResult::Vetoed(Veto::new("frozen_royals")));

    state.move_history = vec![Move::deal_stock(); 5];
    assert!(run_move(&state, Move::tableau_to_tableau("t0", "t1", 1), &[], &bosses).is_applied());
}

#[test]
fn spade_tax_removes_foundation_points() {
    let state = board(vec![(
        "t0",
        vec![down(2, Suit::Hearts, 9), up(1, Suit::Spades, ACE)],
    )]);
    let bosses = [boss(SUIT_TAX_SPADES)];
    let next = applied(run_move(&state, Move::tableau_to_foundation("t0", "f0"), &[], &bosses));
    assert_eq!(next.score, 30);
}

#[test]
fn half_deck_trims_stock_on_first_move() {
    let bosses = [boss(HALF_DECK)];
    assert_eq!(
        apply_boss_round_start(&bosses, round_config()).target_score,
        450
    );
    let state = initial_klondike_deal("half", round_config()).state;
    let mv = legal_moves(&state)
        .into_iter()
        .find(|mv| mv.kind != MoveKind::DealStock)
        .unwrap_or_else(Move::deal_stock);
    let next = applied(run_move(&state, mv.clone(), &[], &bosses));
    if mv.kind == MoveKind::DealStock {
        assert_eq!(next.stock_len(), 10);
    } else {
        assert_eq!(next.stock_len(), 12);
    }
    let again = applied(run_move(&next, Move::deal_stock(), &[], &bosses));
    assert_eq!(again.stock_len(), next.stock_len() - 3);
}

#[test]
fn mirror_moves_reverts_every_fifth_move() {
    let mut state = board(vec![
        ("t0", vec![up(1, Suit::Hearts, 6)]),
        ("t1", vec![up(2, Suit::Clubs, 7)]),
        ("t2", vec![up(3, Suit::Spades, ACE)]),
    ]);
    state.move_history = vec![Move::deal_stock(); 4];
    let bosses = [boss(MIRROR_MOVES)];

    let mirrored = applied(run_move(&state, Move::tableau_to_tableau("t0", "t1", 1), &[], &bosses));
    assert_eq!(mirrored.piles, state.piles);
    assert_eq!(mirrored.score, state.score);
    assert_eq!(mirrored.move_history.len(), 4);

    let kept = applied(run_move(&state, Move::tableau_to_foundation("t2", "f0"), &[], &bosses));
    assert_eq!(kept.foundation_count(), 1);
    assert_eq!(kept.move_history.len(), 5);
}

#[test]
fn boss_of_an_ante_is_stable() {
    assert_eq!(boss_id_for_ante(1), HALF_DECK);
    assert_eq!(boss_id_for_ante(9), boss_id_for_ante(9));
    let content = Content::builtin();
    let bosses = content.bosses_for_round(1);
    assert_eq!(bosses.len(), 1);
    assert_eq!(bosses[0].id, HALF_DECK);
}

#[test]
fn deep_cut_and_overtime_patch_round_config() {
    let jokers = [joker(DEEP_CUT), joker(OVERTIME)];
    let config = apply_joker_round_start(&jokers, &JokerContext::default(), round_config());
    assert_eq!(config.redeals, 3);
    assert_eq!(config.time_limit_sec, 390);
}

#[test]
fn round_end_jokers_adjust_final_score() {
    let summary = RoundSummary {
        score: 1_000,
        time_remaining_sec: 45,
        foundation_count: 10,
        stock_left: 6,
        reveals: 4,
        dealt_this_round: false,
    };
    let ctx = JokerContext::default();
    assert_eq!(joker_round_end_adjustment(&[joker(EARLY_BIRD)], &summary, &ctx), 150);
    assert_eq!(joker_round_end_adjustment(&[joker(WASTE_NOT)], &summary, &ctx), 60);
    assert_eq!(joker_round_end_adjustment(&[joker(TEMPO)], &summary, &ctx), 150);
    assert_eq!(joker_round_end_adjustment(&[joker(ARCHIVIST)], &summary, &ctx), 200);
    assert_eq!(joker_round_end_adjustment(&[joker(OVERTIME)], &summary, &ctx), 0);

    let holo = ActiveJoker::new(joker(WASTE_NOT).def, Some(JokerVariant::Holo));
    assert_eq!(joker_round_end_adjustment(&[holo], &summary, &ctx), 90);

    let spent = RoundSummary {
        time_remaining_sec: 0,
        dealt_this_round: true,
        ..summary
    };
    assert_eq!(joker_round_end_adjustment(&[joker(OVERTIME)], &spent, &ctx), 150);
    assert_eq!(joker_round_end_adjustment(&[joker(TEMPO)], &spent, &ctx), 0);
    assert_eq!(joker_round_end_adjustment(&[joker(EARLY_BIRD)], &spent, &ctx), 0);
}

#[test]
fn royal_decree_allows_one_same_colour_king() {
    let jokers = [joker(ROYAL_DECREE)];
    let mut state = board(vec![
        ("t0", vec![up(1, Suit::Spades, KING)]),
        ("t1", vec![up(2, Suit::Clubs, QUEEN)]),
        ("t2", vec![up(3, Suit::Clubs, KING)]),
    ]);
    assert_eq!(
        is_legal_move(&state, &Move::tableau_to_tableau("t0", "t1", 1)),
        Err(IllegalMove::CannotStack)
    );
    prepare_joker_round(&jokers, &mut state);
    assert_eq!(state.royal_decree_charge, 1);

    let next = applied(run_move(&state, Move::tableau_to_tableau("t0", "t1", 1), &jokers, &[]));
    assert_eq!(next.royal_decree_charge, 0);
    assert_eq!(next.pile("t1").unwrap().len(), 2);
}

#[test]
fn perfect_draw_flips_tops_on_first_deal() {
    let jokers = [joker(PERFECT_DRAW)];
    let mut state = board(vec![
        ("t0", vec![down(1, Suit::Spades, 4)]),
        ("t1", vec![down(2, Suit::Hearts, 8)]),
        (STOCK, vec![down(3, Suit::Clubs, 2), down(4, Suit::Clubs, 3)]),
    ]);
    prepare_joker_round(&jokers, &mut state);
    let next = applied(run_move(&state, Move::deal_stock(), &jokers, &[]));
    assert!(next.pile("t0").unwrap().top().unwrap().face_up);
    assert!(next.pile("t1").unwrap().top().unwrap().face_up);
    assert!(!next.perfect_draw_pending);
}

#[test]
fn snap_doubles_foundation_after_empty_column() {
    let jokers = [joker(SNAP)];
    let state = board(vec![
        ("t0", vec![up(1, Suit::Hearts, 6)]),
        ("t1", vec![up(2, Suit::Clubs, 7)]),
        ("t2", vec![up(4, Suit::Clubs, 9), up(3, Suit::Spades, ACE)]),
    ]);
    let emptied = applied(run_move(&state, Move::tableau_to_tableau("t0", "t1", 1), &jokers, &[]));
    assert_eq!(emptied.snap_charges, 1);
    let doubled = applied(run_move(
        &emptied,
        Move::tableau_to_foundation("t2", "f0"),
        &jokers,
        &[],
    ));
    assert_eq!(doubled.score - emptied.score, 100);
    assert_eq!(doubled.snap_charges, 0);
}

#[test]
fn cascade_rewards_long_runs() {
    let jokers = [joker(CASCADE)];
    let state = board(vec![
        (
            "t0",
            vec![
                up(10, Suit::Clubs, 2),
                up(1, Suit::Hearts, 9),
                up(2, Suit::Clubs, 8),
                up(3, Suit::Hearts, 7),
                up(4, Suit::Spades, 6),
            ],
        ),
        ("t1", vec![up(5, Suit::Spades, 10)]),
    ]);
    let next = applied(run_move(&state, Move::tableau_to_tableau("t0", "t1", 4), &jokers, &[]));
    assert_eq!(next.score, 80);
}

#[test]
fn column_marshal_grants_redeal_on_second_empty_column() {
    let jokers = [joker(COLUMN_MARSHAL)];
    let state = board(vec![
        ("t0", vec![up(1, Suit::Hearts, 6)]),
        ("t1", vec![up(2, Suit::Clubs, 7)]),
        ("t2", vec![up(3, Suit::Spades, 5)]),
    ]);
    let first = applied(run_move(&state, Move::tableau_to_tableau("t0", "t1", 1), &jokers, &[]));
    assert_eq!(first.redeals_left, 2);
    let second = applied(run_move(&first, Move::tableau_to_tableau("t2", "t1", 1), &jokers, &[]));
    assert_eq!(second.redeals_left, 3);
}

#[test]
fn monochrome_favours_black_foundations() {
    let jokers = [joker(MONOCHROME)];
    let black = board(vec![("t0", vec![up(4, Suit::Clubs, 9), up(1, Suit::Clubs, ACE)])]);
    let next = applied(run_move(&black, Move::tableau_to_foundation("t0", "f0"), &jokers, &[]));
    assert_eq!(next.score, 60);
    let red = board(vec![("t0", vec![up(4, Suit::Clubs, 9), up(1, Suit::Hearts, ACE)])]);
    let next = applied(run_move(&red, Move::tableau_to_foundation("t0", "f0"), &jokers, &[]));
    assert_eq!(next.score, 50);
}
