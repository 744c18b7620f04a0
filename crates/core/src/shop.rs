use crate::{
    Content, GameConfig, JokerDef, JokerRarity, JokerVariant, PriceRange, RngState, RoundState,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoostKind {
    #[serde(rename = "redeal")]
    Redeal,
    #[serde(rename = "time10")]
    Time10,
    #[serde(rename = "target10off")]
    Target10Off,
}

impl BoostKind {
    pub const ALL: [BoostKind; 3] = [BoostKind::Redeal, BoostKind::Time10, BoostKind::Target10Off];

    pub fn name(self) -> &'static str {
        match self {
            BoostKind::Redeal => "+1 Redeal",
            BoostKind::Time10 => "+10% Time",
            BoostKind::Target10Off => "Target -10%",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BoostKind::Redeal => "Gain +1 redeal this round",
            BoostKind::Time10 => "Add +10% to round timer",
            BoostKind::Target10Off => "Reduce target by 10% this round",
        }
    }

    pub fn price(self) -> i64 {
        match self {
            BoostKind::Redeal | BoostKind::Time10 => 6,
            BoostKind::Target10Off => 8,
        }
    }
}

/// One-per-round premium offer; it survives rerolls until bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    #[serde(rename = "special-free-reroll")]
    FreeReroll,
    #[serde(rename = "special-redeal-plus")]
    RedealPlus,
    #[serde(rename = "special-time-30")]
    Time30,
    #[serde(rename = "special-target-15")]
    Target15,
    #[serde(rename = "special-god-zephyr")]
    GodZephyr,
    #[serde(rename = "special-rankup-random")]
    RankUpRandom,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 6] = [
        SpecialKind::FreeReroll,
        SpecialKind::RedealPlus,
        SpecialKind::Time30,
        SpecialKind::Target15,
        SpecialKind::GodZephyr,
        SpecialKind::RankUpRandom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpecialKind::FreeReroll => "Free Reroll",
            SpecialKind::RedealPlus => "+1 Redeal Now",
            SpecialKind::Time30 => "+30s Timer",
            SpecialKind::Target15 => "Target -15%",
            SpecialKind::GodZephyr => "God: Zephyr",
            SpecialKind::RankUpRandom => "Rank Up",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SpecialKind::FreeReroll => "Reroll the shop once without the reroll fee.",
            SpecialKind::RedealPlus => "Gain +1 redeal immediately this round.",
            SpecialKind::Time30 => "Add +30 seconds to this round.",
            SpecialKind::Target15 => "Reduce this round's target by 15%.",
            SpecialKind::GodZephyr => "Gain Zephyr god card (reveal tops).",
            SpecialKind::RankUpRandom => "Randomly rank up one scoring category (+0.1x).",
        }
    }

    pub fn price(self) -> i64 {
        match self {
            SpecialKind::FreeReroll => 4,
            SpecialKind::RedealPlus | SpecialKind::RankUpRandom => 7,
            SpecialKind::Time30 => 8,
            SpecialKind::GodZephyr => 9,
            SpecialKind::Target15 => 10,
        }
    }
}

/// A purchase that changes the board in play. Bought between boards, it
/// waits for the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEffect {
    ExtraRedeal,
    TimePercent(u32),
    TimeSeconds(i64),
    TargetCut(u32),
}

impl RoundEffect {
    pub fn of_boost(boost: BoostKind) -> Self {
        match boost {
            BoostKind::Redeal => RoundEffect::ExtraRedeal,
            BoostKind::Time10 => RoundEffect::TimePercent(10),
            BoostKind::Target10Off => RoundEffect::TargetCut(10),
        }
    }

    pub fn of_special(special: SpecialKind) -> Option<Self> {
        match special {
            SpecialKind::RedealPlus => Some(RoundEffect::ExtraRedeal),
            SpecialKind::Time30 => Some(RoundEffect::TimeSeconds(30)),
            SpecialKind::Target15 => Some(RoundEffect::TargetCut(15)),
            SpecialKind::FreeReroll | SpecialKind::GodZephyr | SpecialKind::RankUpRandom => None,
        }
    }

    pub fn apply(self, round: &mut RoundState) {
        match self {
            RoundEffect::ExtraRedeal => round.redeals_left += 1,
            RoundEffect::TimePercent(pct) => {
                let scaled = round.time_remaining_sec as f64 * (100 + pct) as f64 / 100.0;
                round.time_remaining_sec = scaled.round() as i64;
            }
            RoundEffect::TimeSeconds(secs) => round.time_remaining_sec += secs,
            RoundEffect::TargetCut(pct) => {
                let scaled = round.config.target_score as f64 * (100 - pct.min(100)) as f64 / 100.0;
                round.config.target_score = (scaled.round() as i64).max(0);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackKind {
    Cards,
    Jokers,
    Gods,
}

impl PackKind {
    pub const ALL: [PackKind; 3] = [PackKind::Cards, PackKind::Jokers, PackKind::Gods];
    pub const SIZES: [u8; 2] = [3, 5];

    pub fn name(self) -> &'static str {
        match self {
            PackKind::Cards => "Card Pack",
            PackKind::Jokers => "Joker Pack",
            PackKind::Gods => "God Pack",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PackKind::Cards => "A pack of playing cards to enrich the tableau",
            PackKind::Jokers => "A bundle with a chance at higher rarities",
            PackKind::Gods => "A set of god cards to rank up scoring",
        }
    }

    pub fn price(self, size: u8) -> i64 {
        let base = match self {
            PackKind::Cards => 6,
            PackKind::Jokers => 10,
            PackKind::Gods => 9,
        };
        base + (i64::from(size) - 3) * 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OfferItem {
    Joker {
        #[serde(rename = "jokerId")]
        joker_id: String,
        rarity: JokerRarity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant: Option<JokerVariant>,
    },
    Boost {
        #[serde(rename = "boostId")]
        boost: BoostKind,
    },
    God {
        #[serde(rename = "godId")]
        god_id: String,
    },
    Pack {
        #[serde(rename = "packType")]
        pack: PackKind,
        size: u8,
    },
    Special {
        #[serde(rename = "specialId")]
        special: SpecialKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopOffer {
    pub id: String,
    /// Position in the offer row; the special always sits at 0.
    pub slot: usize,
    pub name: String,
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub item: OfferItem,
}

impl ShopOffer {
    pub fn is_special(&self) -> bool {
        matches!(self.item, OfferItem::Special { .. })
    }
}

fn roll_price(rng: &mut RngState, band: PriceRange) -> i64 {
    rng.int(band.min, band.max).unwrap_or(band.min)
}

/// Rarity-weighted joker draw over the registry minus `exclude`.
pub fn pick_weighted_joker<'a>(
    content: &'a Content,
    config: &GameConfig,
    exclude: &HashSet<String>,
    rng: &mut RngState,
) -> Option<&'a JokerDef> {
    let pool: Vec<&JokerDef> = content
        .jokers
        .iter()
        .filter(|joker| !exclude.contains(&joker.id))
        .collect();
    let total: u32 = pool
        .iter()
        .map(|joker| config.rarity_weight(joker.rarity))
        .sum();
    let mut roll = rng.float() * f64::from(total);
    for joker in &pool {
        roll -= f64::from(config.rarity_weight(joker.rarity));
        if roll <= 0.0 {
            return Some(joker);
        }
    }
    pool.last().copied()
}

fn joker_offer(
    content: &Content,
    config: &GameConfig,
    chosen: &mut HashSet<String>,
    rng: &mut RngState,
    id: String,
    slot: usize,
) -> Option<ShopOffer> {
    let joker = pick_weighted_joker(content, config, chosen, rng)?;
    chosen.insert(joker.id.clone());
    let band = config
        .rarity_rule(joker.rarity)
        .map_or(PriceRange { min: 5, max: 9 }, |rule| rule.price);
    Some(ShopOffer {
        id,
        slot,
        name: joker.name.clone(),
        description: joker.description.clone(),
        price: roll_price(rng, band),
        locked: false,
        item: OfferItem::Joker {
            joker_id: joker.id.clone(),
            rarity: joker.rarity,
            variant: None,
        },
    })
}

fn fresh_offer(
    content: &Content,
    config: &GameConfig,
    chosen: &mut HashSet<String>,
    rng: &mut RngState,
    roll: u32,
    slot: usize,
) -> Option<ShopOffer> {
    let id = format!("o{roll}-{slot}");
    let pick = rng.float();
    if pick < 0.2 {
        let boost = BoostKind::ALL[rng.index(BoostKind::ALL.len())];
        return Some(ShopOffer {
            id,
            slot,
            name: boost.name().to_string(),
            description: boost.description().to_string(),
            price: boost.price(),
            locked: false,
            item: OfferItem::Boost { boost },
        });
    }
    if pick < 0.35 && !content.gods.is_empty() {
        let god = &content.gods[rng.index(content.gods.len())];
        return Some(ShopOffer {
            id,
            slot,
            name: god.card.name.clone(),
            description: god.card.description.clone(),
            price: god.price,
            locked: false,
            item: OfferItem::God {
                god_id: god.card.id.clone(),
            },
        });
    }
    if pick < 0.6 {
        let pack = PackKind::ALL[rng.index(PackKind::ALL.len())];
        let size = PackKind::SIZES[rng.index(PackKind::SIZES.len())];
        return Some(ShopOffer {
            id,
            slot,
            name: pack.name().to_string(),
            description: pack.description().to_string(),
            price: pack.price(size),
            locked: false,
            item: OfferItem::Pack { pack, size },
        });
    }
    joker_offer(content, config, chosen, rng, id, slot)
}

fn roll_variant(config: &GameConfig, offer: &mut ShopOffer, rng: &mut RngState) {
    let OfferItem::Joker { variant, .. } = &mut offer.item else {
        return;
    };
    let roll = rng.float();
    let (picked, bump) = if roll < config.shop.holo_chance {
        (JokerVariant::Holo, config.shop.holo_bump)
    } else if roll < config.shop.foil_chance {
        (JokerVariant::Foil, config.shop.foil_bump)
    } else {
        return;
    };
    *variant = Some(picked);
    offer.name = format!("{} [{}]", offer.name, picked.label());
    offer.price += bump;
}

pub fn special_offer(seed: &str, round: u32) -> ShopOffer {
    let mut rng = RngState::new(&format!("{seed}-special-{round}"));
    let special = SpecialKind::ALL[rng.index(SpecialKind::ALL.len())];
    ShopOffer {
        id: format!("special-{round}"),
        slot: 0,
        name: special.name().to_string(),
        description: special.description().to_string(),
        price: special.price(),
        locked: true,
        item: OfferItem::Special { special },
    }
}

/// Builds the offer row for `round` after `roll` rerolls. Locked offers in
/// `previous` keep their slot; every other slot is drawn fresh. Same inputs
/// give the same row.
pub fn generate_shop_offers(
    content: &Content,
    config: &GameConfig,
    seed: &str,
    round: u32,
    roll: u32,
    previous: &[ShopOffer],
) -> Vec<ShopOffer> {
    let mut rng = RngState::new(&format!("{seed}-shop-{round}-{roll}"));
    let mut variant_rng = RngState::new(&format!("{seed}-shop-{round}-v2-{roll}"));
    let kept: Vec<&ShopOffer> = previous
        .iter()
        .filter(|offer| offer.locked && !offer.is_special())
        .collect();
    let mut chosen: HashSet<String> = kept
        .iter()
        .filter_map(|offer| match &offer.item {
            OfferItem::Joker { joker_id, .. } => Some(joker_id.clone()),
            _ => None,
        })
        .collect();

    let mut offers = vec![special_offer(seed, round)];
    for slot in 1..=config.shop.slots {
        if let Some(locked) = kept.iter().find(|offer| offer.slot == slot) {
            offers.push((*locked).clone());
            continue;
        }
        if let Some(mut offer) = fresh_offer(content, config, &mut chosen, &mut rng, roll, slot) {
            roll_variant(config, &mut offer, &mut variant_rng);
            offers.push(offer);
        }
    }
    offers
}

/// Live shop between boards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopState {
    pub round: u32,
    pub rolls: u32,
    pub offers: Vec<ShopOffer>,
    /// The next reroll costs nothing while set.
    pub free_reroll: bool,
    pub special_sold: bool,
}

impl ShopState {
    pub fn open(content: &Content, config: &GameConfig, seed: &str, round: u32) -> Self {
        Self {
            round,
            rolls: 0,
            offers: generate_shop_offers(content, config, seed, round, 0, &[]),
            free_reroll: false,
            special_sold: false,
        }
    }

    pub fn reroll_cost(&self, config: &GameConfig) -> i64 {
        if self.rolls == 0 || self.free_reroll {
            0
        } else {
            config.economy.reroll_cost
        }
    }

    pub fn reroll(&mut self, content: &Content, config: &GameConfig, seed: &str) {
        self.rolls += 1;
        self.free_reroll = false;
        let mut offers =
            generate_shop_offers(content, config, seed, self.round, self.rolls, &self.offers);
        if self.special_sold {
            offers.retain(|offer| !offer.is_special());
        }
        self.offers = offers;
    }

    pub fn offer(&self, id: &str) -> Option<&ShopOffer> {
        self.offers.iter().find(|offer| offer.id == id)
    }

    pub fn take(&mut self, id: &str) -> Option<ShopOffer> {
        let idx = self.offers.iter().position(|offer| offer.id == id)?;
        let offer = self.offers.remove(idx);
        if offer.is_special() {
            self.special_sold = true;
        }
        Some(offer)
    }

    /// Flips the lock on a non-special offer; returns the new lock state.
    pub fn toggle_lock(&mut self, id: &str) -> Option<bool> {
        let offer = self
            .offers
            .iter_mut()
            .find(|offer| offer.id == id && !offer.is_special())?;
        offer.locked = !offer.locked;
        Some(offer.locked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_price_grows_with_size() {
        assert_eq!(PackKind::Cards.price(3), 6);
        assert_eq!(PackKind::Jokers.price(5), 14);
        assert_eq!(PackKind::Gods.price(5), 13);
    }

    #[test]
    fn offers_serialize_with_kind_tag() {
        let offer = ShopOffer {
            id: "o0-1".to_string(),
            slot: 1,
            name: BoostKind::Time10.name().to_string(),
            description: BoostKind::Time10.description().to_string(),
            price: 6,
            locked: false,
            item: OfferItem::Boost {
                boost: BoostKind::Time10,
            },
        };
        let json = serde_json::to_value(&offer).expect("serialize");
        assert_eq!(json["kind"], "boost");
        assert_eq!(json["boostId"], "time10");
        let back: ShopOffer = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, offer);
    }

    #[test]
    fn target_cut_rounds_and_never_goes_negative() {
        let config = crate::GameConfig::default()
            .round_config(1, crate::Difficulty::Medium)
            .expect("config");
        let mut round = RoundState::new(config, Vec::new());
        RoundEffect::of_boost(BoostKind::Target10Off).apply(&mut round);
        assert_eq!(round.config.target_score, 450);
        RoundEffect::TargetCut(150).apply(&mut round);
        assert_eq!(round.config.target_score, 0);
    }

    #[test]
    fn time_boost_scales_remaining_clock() {
        let config = crate::GameConfig::default()
            .round_config(1, crate::Difficulty::Medium)
            .expect("config");
        let mut round = RoundState::new(config, Vec::new());
        round.time_remaining_sec = 95;
        RoundEffect::of_boost(BoostKind::Time10).apply(&mut round);
        assert_eq!(round.time_remaining_sec, 105);
    }

    #[test]
    fn special_is_fixed_per_round() {
        let first = special_offer("seed", 2);
        let again = special_offer("seed", 2);
        assert_eq!(first, again);
        assert_eq!(first.slot, 0);
        assert!(first.locked);
    }
}
