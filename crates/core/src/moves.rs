use crate::{
    apply_boss_after_move, apply_boss_on_score, boss_veto, can_stack_tableau, compute_move_score,
    is_legal_move, royal_decree_applies, ActiveJoker, BossDef, Card, IllegalMove, JokerContext,
    Move, MoveKind, PileKind, RoundState, ScoringRules, Veto, STOCK, WASTE,
};
use tracing::debug;

/// Everything outside the board that a move consults.
#[derive(Debug, Clone)]
pub struct MoveOptions<'a> {
    pub jokers: &'a [ActiveJoker],
    pub bosses: &'a [BossDef],
    pub ctx: JokerContext,
    pub scoring: ScoringRules,
}

impl<'a> MoveOptions<'a> {
    pub fn new(jokers: &'a [ActiveJoker], bosses: &'a [BossDef]) -> Self {
        Self {
            jokers,
            bosses,
            ctx: JokerContext::default(),
            scoring: ScoringRules::DEFAULT,
        }
    }

    pub fn with_ctx(mut self, ctx: JokerContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }
}

impl Default for MoveOptions<'_> {
    fn default() -> Self {
        Self::new(&[], &[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveResult {
    Applied(RoundState),
    Illegal(IllegalMove),
    Vetoed(Veto),
}

impl MoveResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveResult::Applied(_))
    }
}

/// Applies `mv`, or returns the unchanged state if it is vetoed or illegal.
pub fn apply_move(state: &RoundState, mv: &Move, opts: &MoveOptions<'_>) -> RoundState {
    match try_apply_move(state, mv, opts) {
        MoveResult::Applied(next) => next,
        MoveResult::Illegal(_) | MoveResult::Vetoed(_) => state.clone(),
    }
}

pub fn try_apply_move(state: &RoundState, mv: &Move, opts: &MoveOptions<'_>) -> MoveResult {
    if let Some(veto) = boss_veto(opts.bosses, mv, state) {
        debug!(%mv, reason = %veto, "move vetoed");
        return MoveResult::Vetoed(veto);
    }
    if let Err(reason) = is_legal_move(state, mv) {
        debug!(%mv, %reason, "illegal move");
        return MoveResult::Illegal(reason);
    }
    if mv.kind == MoveKind::Undo {
        return MoveResult::Applied(undo(state));
    }

    let mut next = state.clone();
    next.undo_stack.push(state.snapshot());
    next.move_history.push(mv.clone());
    next.stats.moves += 1;

    let from = mv.from.as_deref().unwrap_or_default();
    let to = mv.to.as_deref().unwrap_or_default();
    match mv.kind {
        MoveKind::TableauToTableau => {
            let count = mv.run_len();
            if decree_needed(state, from, to, count) {
                next.royal_decree_charge = 0;
            }
            let moving = take_cards(&mut next, from, count);
            put_cards(&mut next, to, moving);
            if settle_source(&mut next, from) {
                for joker in opts.jokers {
                    joker.def.hooks.on_column_emptied(&mut next);
                }
            }
        }
        MoveKind::TableauToFoundation => {
            let card = take_cards(&mut next, from, 1);
            put_cards(&mut next, to, card);
            next.stats.foundation_moves += 1;
            settle_source(&mut next, from);
        }
        MoveKind::WasteToTableau | MoveKind::WasteToFoundation => {
            let card = take_cards(&mut next, WASTE, 1);
            put_cards(&mut next, to, card);
            if mv.kind == MoveKind::WasteToFoundation {
                next.stats.foundation_moves += 1;
            }
            next.waste_group_remaining = next.waste_group_remaining.saturating_sub(1);
        }
        MoveKind::DealStock => deal_stock(&mut next),
        MoveKind::Undo => {}
    }

    let scored = compute_move_score(state, &next, mv, opts.jokers, &opts.ctx, &opts.scoring);
    let mut delta = scored.delta;
    if mv.kind.is_foundation() {
        let snap = opts
            .jokers
            .iter()
            .any(|joker| joker.def.hooks.spends_snap_charges());
        if snap && state.snap_charges > 0 {
            delta *= 2;
            next.snap_charges = next.snap_charges.saturating_sub(1);
        }
        if state.double_next_charges > 0 {
            delta *= 2;
            next.double_next_charges -= 1;
        }
    }
    let delta = apply_boss_on_score(
        opts.bosses,
        delta,
        &next,
        mv,
        &scored.extras,
        &scored.breakdown,
    );
    next.score = state.score + delta;
    next.streak = scored.next_streak;
    next.streak_multiplier = scored.next_multiplier;

    MoveResult::Applied(apply_boss_after_move(opts.bosses, state, next, mv))
}

/// Whether a tableau run only lands by spending the decree charge.
fn decree_needed(state: &RoundState, from: &str, to: &str, count: usize) -> bool {
    let bottom = state
        .pile(from)
        .and_then(|pile| pile.len().checked_sub(count).and_then(|idx| pile.cards.get(idx)));
    let dest = state.pile(to).and_then(|pile| pile.top());
    match (bottom, dest) {
        (Some(bottom), Some(dest)) => {
            !can_stack_tableau(bottom, dest) && royal_decree_applies(state, bottom, dest)
        }
        _ => false,
    }
}

fn take_cards(round: &mut RoundState, pile_id: &str, count: usize) -> Vec<Card> {
    round
        .pile_mut(pile_id)
        .map(|pile| {
            let at = pile.len().saturating_sub(count);
            pile.cards.split_off(at)
        })
        .unwrap_or_default()
}

fn put_cards(round: &mut RoundState, pile_id: &str, cards: Vec<Card>) {
    if let Some(pile) = round.pile_mut(pile_id) {
        pile.cards.extend(cards);
    }
}

/// Flips the exposed tableau card and books reveal/empty-column stats.
/// Returns true if the column was emptied.
fn settle_source(round: &mut RoundState, pile_id: &str) -> bool {
    let (revealed, emptied) = match round.pile_mut(pile_id) {
        Some(pile) if pile.kind == PileKind::Tableau => match pile.cards.last_mut() {
            Some(top) if !top.face_up => {
                top.face_up = true;
                (true, false)
            }
            Some(_) => (false, false),
            None => (false, true),
        },
        _ => (false, false),
    };
    if revealed {
        round.stats.tableau_reveals += 1;
    }
    if emptied {
        round.stats.columns_emptied += 1;
        round.snap_charges += 1;
    }
    emptied
}

fn deal_stock(round: &mut RoundState) {
    if round.stock_len() == 0 {
        if round.redeals_left > 0 {
            let mut recycled = take_cards(round, WASTE, usize::MAX);
            recycled.reverse();
            for card in &mut recycled {
                card.face_up = false;
            }
            put_cards(round, STOCK, recycled);
            round.redeals_left -= 1;
            round.waste_group_remaining = 0;
        }
    } else {
        let count = round.config.deal_size.min(round.stock_len());
        let mut dealt = take_cards(round, STOCK, count);
        for card in &mut dealt {
            card.face_up = true;
        }
        put_cards(round, WASTE, dealt);
        if round.perfect_draw_pending {
            round.reveal_tableau_tops();
            round.perfect_draw_pending = false;
        }
        round.waste_group_remaining = count;
    }
    round.dealt_this_round = true;
}

/// Pops the latest snapshot. Stats and one-shot flags are not rolled back.
fn undo(state: &RoundState) -> RoundState {
    let mut next = state.clone();
    if let Some(snapshot) = next.undo_stack.pop() {
        next.restore(snapshot);
        next.move_history.pop();
        next.waste_group_remaining = next.config.deal_size.min(next.waste_len());
    }
    next
}
