use super::*;
use crate::*;
use std::collections::HashSet;

impl Session {
    pub fn reroll_shop(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.require_live_run()?;
        let cost = self
            .shop
            .as_ref()
            .ok_or(RunError::ShopClosed)?
            .reroll_cost(&self.config);
        self.spend(cost)?;
        let run = self.run.as_ref().ok_or(RunError::NoRun)?;
        let shop = self.shop.as_mut().ok_or(RunError::ShopClosed)?;
        shop.reroll(&self.content, &self.config, &run.seed);
        events.push(Event::ShopRerolled {
            offers: shop.offers.len(),
            cost,
            coins: run.coins,
        });
        self.persist()
    }

    pub fn toggle_lock_offer(&mut self, id: &str, events: &mut EventBus) -> Result<bool, RunError> {
        let shop = self.shop.as_mut().ok_or(RunError::ShopClosed)?;
        let locked = shop
            .toggle_lock(id)
            .ok_or_else(|| RunError::UnknownOffer(id.to_string()))?;
        events.push(Event::OfferLockToggled {
            offer_id: id.to_string(),
            locked,
        });
        Ok(locked)
    }

    pub fn buy_offer(&mut self, id: &str, events: &mut EventBus) -> Result<(), RunError> {
        self.require_live_run()?;
        let offer = self
            .shop
            .as_ref()
            .ok_or(RunError::ShopClosed)?
            .offer(id)
            .cloned()
            .ok_or_else(|| RunError::UnknownOffer(id.to_string()))?;
        self.check_offer(&offer)?;
        self.spend(offer.price)?;
        if let Some(shop) = self.shop.as_mut() {
            shop.take(id);
        }

        match &offer.item {
            OfferItem::Joker {
                joker_id, variant, ..
            } => self.equip(EquippedJoker::new(joker_id, *variant), events)?,
            OfferItem::Boost { boost } => {
                self.apply_round_effect(RoundEffect::of_boost(*boost), events)
            }
            OfferItem::God { god_id } => self.gain_god_card(god_id, events)?,
            OfferItem::Pack { pack, .. } => self.open_pack(*pack, &offer.id, events)?,
            OfferItem::Special { special } => self.apply_special(*special, events)?,
        }

        let coins = self.run()?.coins;
        events.push(Event::OfferBought {
            offer_id: offer.id.clone(),
            cost: offer.price,
            coins,
        });
        self.auto_complete(events)?;
        self.persist()
    }

    pub fn sell_joker(&mut self, id: &str, events: &mut EventBus) -> Result<i64, RunError> {
        self.require_live_run()?;
        let rarity = self
            .content
            .joker_by_id(id)
            .map_or(JokerRarity::Common, |joker| joker.rarity);
        let refund = self.config.sell_refund(rarity);
        let slots = self.config.economy.joker_slots;
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        JokerTray::new(&mut run.jokers, slots).remove(id)?;
        run.coins += refund;
        events.push(Event::JokerSold {
            id: id.to_string(),
            refund,
            coins: run.coins,
        });
        events.push(Event::info(format!("Sold for {refund}")));
        self.persist()?;
        Ok(refund)
    }

    /// Rejects a purchase that could not be delivered, before any coins move.
    fn check_offer(&self, offer: &ShopOffer) -> Result<(), RunError> {
        let run = self.run()?;
        let tray_full = run.jokers.len() >= self.config.economy.joker_slots;
        match &offer.item {
            OfferItem::Joker { .. }
            | OfferItem::Pack {
                pack: PackKind::Jokers,
                ..
            } if tray_full => Err(InventoryError::NoJokerSlots.into()),
            OfferItem::God { god_id } if self.content.god_by_id(god_id).is_none() => {
                Err(RunError::UnknownGod(god_id.clone()))
            }
            _ => Ok(()),
        }
    }

    fn equip(&mut self, joker: EquippedJoker, events: &mut EventBus) -> Result<(), RunError> {
        let slots = self.config.economy.joker_slots;
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        let id = joker.id.clone();
        JokerTray::new(&mut run.jokers, slots).equip(joker)?;
        events.push(Event::JokerEquipped { id });
        Ok(())
    }

    fn gain_god_card(&mut self, god_id: &str, events: &mut EventBus) -> Result<(), RunError> {
        let card = self
            .content
            .god_by_id(god_id)
            .map(|god| god.card.clone())
            .ok_or_else(|| RunError::UnknownGod(god_id.to_string()))?;
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        run.god_cards.push(card);
        events.push(Event::GodCardGained {
            id: god_id.to_string(),
        });
        Ok(())
    }

    /// Applies to the live round, or waits for the next one.
    pub(crate) fn apply_round_effect(&mut self, effect: RoundEffect, events: &mut EventBus) {
        match self.round.as_mut().filter(|round| round.phase.accepts_moves()) {
            Some(round) => {
                effect.apply(&mut round.state);
                events.push(Event::EffectApplied { effect });
            }
            None => {
                self.pending_effects.push(effect);
                events.push(Event::EffectQueued { effect });
            }
        }
    }

    /// Packs hand over a single draw: a weighted joker, a god card, or a
    /// redeal for card packs.
    fn open_pack(
        &mut self,
        pack: PackKind,
        offer_id: &str,
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        let run = self.run()?;
        let shop_round = self.shop.as_ref().map_or(0, |shop| shop.round);
        let mut rng = RngState::new(&format!("{}-pack-{shop_round}-{offer_id}", run.seed));
        match pack {
            PackKind::Cards => {
                self.apply_round_effect(RoundEffect::ExtraRedeal, events);
                Ok(())
            }
            PackKind::Jokers => {
                let owned: HashSet<String> =
                    run.jokers.iter().map(|joker| joker.id.clone()).collect();
                let Some(joker) = pick_weighted_joker(&self.content, &self.config, &owned, &mut rng)
                else {
                    events.push(Event::info("The pack was empty."));
                    return Ok(());
                };
                let equipped = EquippedJoker::new(&joker.id, None);
                self.equip(equipped, events)
            }
            PackKind::Gods => {
                if self.content.gods.is_empty() {
                    return Ok(());
                }
                let pick = rng.index(self.content.gods.len());
                let god_id = self.content.gods[pick].card.id.clone();
                self.gain_god_card(&god_id, events)
            }
        }
    }

    fn apply_special(
        &mut self,
        special: SpecialKind,
        events: &mut EventBus,
    ) -> Result<(), RunError> {
        if let Some(effect) = RoundEffect::of_special(special) {
            self.apply_round_effect(effect, events);
            return Ok(());
        }
        match special {
            SpecialKind::FreeReroll => {
                if let Some(shop) = self.shop.as_mut() {
                    shop.free_reroll = true;
                }
                Ok(())
            }
            SpecialKind::GodZephyr => self.gain_god_card(ZEPHYR, events),
            SpecialKind::RankUpRandom => {
                let step = self.config.economy.rank_step;
                let run = self.run.as_mut().ok_or(RunError::NoRun)?;
                let mut rng = RngState::from_snapshot(&run.rng);
                let category = ScoreCategory::ALL[rng.index(ScoreCategory::ALL.len())];
                run.rng = rng.snapshot();
                let rank = run.score_ranks.bump(category, step);
                let (ranks, coins) = (run.score_ranks, run.coins);
                self.sync_round_ranks(ranks);
                events.push(Event::RankedUp {
                    category,
                    rank,
                    coins,
                });
                Ok(())
            }
            SpecialKind::RedealPlus | SpecialKind::Time30 | SpecialKind::Target15 => Ok(()),
        }
    }
}
