use super::*;
use crate::*;
use tracing::{info, warn};

impl Session {
    /// Starts a fresh run. `daily-` seeds run in daily mode and are marked played.
    pub fn start_run(
        &mut self,
        seed: &str,
        difficulty: Difficulty,
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        let mode = if is_daily_seed(seed) {
            RunMode::Daily
        } else {
            RunMode::Standard
        };
        self.reset_progress();
        self.run = Some(RunState::new(seed, mode, difficulty));
        self.persist()?;
        if mode == RunMode::Daily {
            mark_daily_played(self.store.as_mut(), seed)?;
        }
        info!(seed, ?mode, ?difficulty, "run started");
        events.push(Event::RunStarted {
            seed: seed.to_string(),
            mode,
            difficulty,
        });
        Ok(())
    }

    /// Resumes the stored run at the first board of its ante not yet played.
    pub fn continue_saved_run(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        let mut run = load_run(self.store.as_ref()).ok_or(RunError::NoSavedRun)?;
        let before = run.jokers.len();
        run.jokers.retain(|joker| {
            let known = self.content.joker_by_id(&joker.id).is_some();
            if !known {
                warn!(id = %joker.id, "dropping unknown joker");
            }
            known
        });
        let dropped = run.jokers.len() != before;
        self.reset_progress();
        self.blind_index = run.boards_done_in_ante().min(2);
        events.push(Event::RunResumed {
            seed: run.seed.clone(),
            ante: run.ante,
            blind: BlindKind::from_index(self.blind_index),
        });
        self.run = Some(run);
        if dropped {
            self.persist()?;
        }
        Ok(())
    }

    pub fn start_round(&mut self, blind: BlindKind, events: &mut EventBus) -> Result<(), RunError> {
        self.require_live_run()?;
        if self.live_round().is_some() {
            return Err(RunError::RoundInProgress);
        }
        let jokers = self.active_jokers();
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        let base_bosses = if blind == BlindKind::Boss {
            self.content.bosses_for_round(run.ante)
        } else {
            Vec::new()
        };
        let mut state = create_round(
            &self.config,
            RoundSetup {
                seed: &run.seed,
                ante: run.ante,
                blind,
                difficulty: run.difficulty,
                bosses: &base_bosses,
                jokers: &jokers,
                score_ranks: run.score_ranks,
            },
        )?;
        state.tactician_available = jokers.iter().any(|joker| joker.id() == TACTICIAN);
        for effect in self.pending_effects.drain(..) {
            effect.apply(&mut state);
            events.push(Event::EffectApplied { effect });
        }

        if blind == BlindKind::Boss {
            self.skip_bonus_bank += match (self.skipped_small, self.skipped_big) {
                (true, true) => self.config.economy.skip_bonus_double,
                (true, false) | (false, true) => self.config.economy.skip_bonus_single,
                (false, false) => 0,
            };
            run.modifiers = base_bosses.iter().map(|boss| boss.id.clone()).collect();
        }
        let bosses = scale_bosses_for_difficulty(&base_bosses, run.difficulty);

        events.push(Event::RoundStarted {
            ante: run.ante,
            blind,
            target: state.config.target_score,
            time_sec: state.time_remaining_sec,
            redeals: state.redeals_left,
            boss: bosses.first().map(|boss| boss.id.clone()),
        });
        self.blind_index = blind.index();
        self.shop = None;
        self.last_outcome = None;
        self.paused = false;
        self.round = Some(ActiveRound {
            state,
            blind,
            bosses,
            phase: RoundPhase::Dealt,
        });
        self.persist()
    }

    pub fn start_next_board(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.start_round(self.current_blind(), events)
    }

    pub fn skip_to_big(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_live_run()?;
        if self.blind_index == 0 {
            self.skipped_small = true;
        }
        self.start_round(BlindKind::Big, events)
    }

    pub fn skip_to_boss(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_live_run()?;
        if self.blind_index == 0 {
            self.skipped_small = true;
        }
        if self.blind_index <= 1 {
            self.skipped_big = true;
        }
        self.start_round(BlindKind::Boss, events)
    }

    /// Closes the live round. A forced success skips evaluation and pays a
    /// flat share of the target. Opens the shop unless the run just ended.
    pub fn complete_round(
        &mut self,
        force_success: bool,
        events: &mut EventBus,
    ) -> Result<RoundOutcome, RunError> {
        let jokers = self.active_jokers();
        let config = &self.config;
        let round = self.round.as_mut().ok_or(RunError::NoActiveRound)?;
        if !round.phase.accepts_moves() {
            return Err(RunError::RoundFinished);
        }
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;

        let outcome = if force_success {
            forced_outcome(config, &round.state, round.blind)
        } else {
            evaluate_round(config, &round.state, round.blind)?
        };
        let adjustment = joker_round_end_adjustment(
            &jokers,
            &RoundSummary::of(&round.state),
            &run.joker_ctx(),
        );
        let outcome = outcome.adjusted(config, adjustment);

        let skip_bonus = std::mem::take(&mut self.skip_bonus_bank);
        run.coins += outcome.coins_earned + skip_bonus;
        run.history.push(HistoryEntry {
            ante: run.ante,
            score: round.state.score,
        });
        run.bump_stat("roundsPlayed");
        if outcome.perfect_clear {
            run.bump_stat("perfectClears");
        }
        round.phase = if outcome.success {
            RoundPhase::Succeeded
        } else if round.state.time_remaining_sec <= 0 {
            RoundPhase::TimedOut
        } else {
            RoundPhase::Failed
        };
        info!(
            ante = run.ante,
            blind = %outcome.blind,
            score = outcome.score,
            success = outcome.success,
            coins = outcome.coins_earned,
            "round completed"
        );
        events.push(Event::RoundCompleted {
            outcome,
            skip_bonus,
            coins: run.coins,
        });

        if !outcome.success {
            self.game_over = true;
            events.push(Event::RunEnded {
                ante: run.ante,
                score: round.state.score,
            });
        } else {
            run.bump_stat("roundsWon");
            if round.blind == BlindKind::Boss {
                run.ante += 1;
                self.blind_index = 0;
                self.skipped_small = false;
                self.skipped_big = false;
                if run.mode == RunMode::Daily {
                    record_daily_best(self.store.as_mut(), &run.seed, round.state.score)?;
                }
                events.push(Event::AnteAdvanced { ante: run.ante });
            } else {
                self.blind_index = round.blind.index() + 1;
            }
            let shop = ShopState::open(
                &self.content,
                config,
                &run.seed,
                run.history.len() as u32,
            );
            events.push(Event::ShopOpened {
                offers: shop.offers.len(),
                reroll_cost: shop.reroll_cost(config),
            });
            self.shop = Some(shop);
        }
        self.last_outcome = Some(outcome);
        self.persist()?;
        Ok(outcome)
    }

    /// One second of clock. Hitting zero closes the round as timed out.
    pub fn tick(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        if self.paused {
            return Ok(());
        }
        let Ok(round) = self.live_round_mut() else {
            return Ok(());
        };
        if round.state.time_remaining_sec <= 0 {
            return Ok(());
        }
        round.state.time_remaining_sec -= 1;
        if round.state.time_remaining_sec > 0 {
            return Ok(());
        }
        events.push(Event::TimedOut);
        self.complete_round(false, events).map(|_| ())
    }

    pub fn set_paused(&mut self, paused: bool, events: &mut EventBus) {
        if self.paused != paused {
            self.paused = paused;
            events.push(Event::Paused { paused });
        }
    }
}
