use super::*;
use crate::*;

impl Session {
    /// Applies a move to the live round. Rule and modifier rejections come
    /// back as `Ok` outcomes; `Err` means there is nothing to play on.
    pub fn submit_move(
        &mut self,
        mv: Move,
        events: &mut EventBus,
    ) -> Result<MoveOutcome, RunError> {
        self.require_live_run()?;
        let jokers = self.active_jokers();
        let ctx = self.run()?.joker_ctx();
        let scoring = self.config.scoring;
        let round = self.live_round_mut()?;
        let opts = MoveOptions::new(&jokers, &round.bosses)
            .with_ctx(ctx)
            .with_scoring(scoring);

        let outcome = match try_apply_move(&round.state, &mv, &opts) {
            MoveResult::Applied(next) => {
                let delta = next.score - round.state.score;
                round.state = next;
                round.phase = RoundPhase::InProgress;
                events.push(Event::MoveApplied {
                    mv,
                    delta,
                    score: round.state.score,
                });
                MoveOutcome::Applied { delta }
            }
            MoveResult::Vetoed(veto) => {
                events.push(Event::MoveVetoed {
                    mv,
                    reason: veto.reason.clone(),
                });
                MoveOutcome::Vetoed(veto)
            }
            MoveResult::Illegal(reason) if round.state.tactician_available => {
                round.state.tactician_available = false;
                events.push(Event::MoveForgiven { mv, reason });
                events.push(Event::info("Tactician forgives an illegal move."));
                MoveOutcome::Forgiven(reason)
            }
            MoveResult::Illegal(reason) => {
                events.push(Event::MoveRejected { mv, reason });
                MoveOutcome::Illegal(reason)
            }
        };
        if matches!(outcome, MoveOutcome::Applied { .. }) {
            self.auto_complete(events)?;
        }
        Ok(outcome)
    }

    pub fn deal_stock(&mut self, events: &mut EventBus) -> Result<MoveOutcome, RunError> {
        self.submit_move(Move::deal_stock(), events)
    }

    pub fn undo(&mut self, events: &mut EventBus) -> Result<MoveOutcome, RunError> {
        self.submit_move(Move::undo(), events)
    }

    /// First tableau card that can go up to a foundation.
    pub fn hint(&self, events: &mut EventBus) -> Result<Option<Move>, RunError> {
        let state = self.live_round().ok_or(RunError::NoActiveRound)?;
        let found = (0..TABLEAU_COLUMNS)
            .flat_map(|col| {
                (0..FOUNDATIONS)
                    .map(move |f| Move::tableau_to_foundation(&tableau_id(col), &foundation_id(f)))
            })
            .find(|mv| is_legal_move(state, mv).is_ok());
        events.push(Event::HintFound { mv: found.clone() });
        Ok(found)
    }

    /// Reshuffles everything off the foundations into a new layout.
    pub fn full_redeal(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_live_run()?;
        let (seed, ante) = {
            let run = self.run()?;
            (run.seed.clone(), run.ante)
        };
        let round = self.live_round_mut()?;
        if round.state.redeals_left <= 0 {
            return Err(RunError::NoRedeals);
        }
        let rng_seed = format!("{seed}-fullredeal-{ante}-{}", round.state.redeals_left);
        round.state = crate::full_redeal(&round.state, &rng_seed);
        round.phase = RoundPhase::InProgress;
        events.push(Event::Redealt {
            redeals_left: round.state.redeals_left,
        });
        Ok(())
    }

    /// Closes the round as a success once the target is reached.
    pub(crate) fn auto_complete(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        let reached = self
            .live_round()
            .is_some_and(|state| state.score >= state.config.target_score);
        if reached {
            self.complete_round(true, events)?;
        }
        Ok(())
    }
}
