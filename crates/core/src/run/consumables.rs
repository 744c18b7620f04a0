use super::*;
use crate::*;

impl Session {
    /// Spends a held god card. Board effects need a live round; without one
    /// the card stays in hand.
    pub fn use_god_card(&mut self, id: &str, events: &mut EventBus) -> Result<(), RunError> {
        self.require_live_run()?;
        let effect = self
            .run()?
            .god_cards
            .iter()
            .find(|card| card.id == id)
            .map(|card| card.effect)
            .ok_or_else(|| InventoryError::GodCardMissing(id.to_string()))?;
        if effect.needs_round() && self.live_round().is_none() {
            return Err(RunError::NoActiveRound);
        }
        let step = self.config.economy.rank_step;
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        let card = take_god_card(&mut run.god_cards, id)?;

        if let Some(category) = effect.rank_category() {
            let rank = run.score_ranks.bump(category, step);
            run.score_rank_patrons
                .insert(category, Patron::of(&card, category));
            let (ranks, coins) = (run.score_ranks, run.coins);
            self.sync_round_ranks(ranks);
            events.push(Event::RankedUp {
                category,
                rank,
                coins,
            });
        } else {
            let round = self.live_round_mut()?;
            let state = &mut round.state;
            match effect {
                GodEffect::RevealTops => {
                    let flipped = state.reveal_tableau_tops();
                    state.stats.tableau_reveals += flipped as u32;
                }
                GodEffect::TimePlus => state.time_remaining_sec += 30,
                GodEffect::RedealPlus => state.redeals_left += 1,
                GodEffect::DoubleNext => state.double_next_charges += 1,
                GodEffect::RankUpFoundation | GodEffect::RankUpReveal | GodEffect::RankUpEmpty => {}
            }
        }
        events.push(Event::GodCardUsed {
            id: id.to_string(),
            effect,
        });
        self.persist()
    }

    pub fn rank_up(
        &mut self,
        category: ScoreCategory,
        events: &mut EventBus,
    ) -> Result<f64, RunError> {
        self.require_live_run()?;
        self.spend(self.config.economy.rank_up_cost)?;
        let step = self.config.economy.rank_step;
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        let rank = run.score_ranks.bump(category, step);
        let (ranks, coins) = (run.score_ranks, run.coins);
        self.sync_round_ranks(ranks);
        events.push(Event::RankedUp {
            category,
            rank,
            coins,
        });
        self.persist()?;
        Ok(rank)
    }

    pub fn unequip_joker(&mut self, id: &str, events: &mut EventBus) -> Result<(), RunError> {
        let slots = self.config.economy.joker_slots;
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        JokerTray::new(&mut run.jokers, slots).remove(id)?;
        events.push(Event::JokerUnequipped { id: id.to_string() });
        self.persist()
    }

    /// Moves a joker within the tray; hooks fire in tray order.
    pub fn reorder_joker(
        &mut self,
        id: &str,
        to_index: usize,
        events: &mut EventBus,
    ) -> Result<usize, RunError> {
        let slots = self.config.economy.joker_slots;
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        let index = JokerTray::new(&mut run.jokers, slots).reorder(id, to_index)?;
        events.push(Event::JokerReordered {
            id: id.to_string(),
            index,
        });
        self.persist()?;
        Ok(index)
    }

    /// Rank changes score from the very next move of the live round.
    pub(crate) fn sync_round_ranks(&mut self, ranks: ScoreRanks) {
        if let Some(round) = self.round.as_mut() {
            round.state.score_ranks = ranks;
        }
    }
}
