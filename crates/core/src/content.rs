use crate::{
    boss_id_for_ante, builtin_bosses, builtin_jokers, ActiveJoker, BossDef, EquippedJoker, GodCard,
    GodEffect, JokerDef,
};
use tracing::warn;

pub const ZEPHYR: &str = "zephyr";
pub const CHRONOS: &str = "chronos";
pub const ATHENA: &str = "athena";
pub const ARES: &str = "ares";
pub const HERMES: &str = "hermes";
pub const HESTIA: &str = "hestia";

/// A god card as sold in the shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GodDef {
    pub card: GodCard,
    pub price: i64,
}

fn god(id: &str, name: &str, description: &str, effect: GodEffect, price: i64) -> GodDef {
    GodDef {
        card: GodCard {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            effect,
        },
        price,
    }
}

pub fn builtin_gods() -> Vec<GodDef> {
    vec![
        god(
            ZEPHYR,
            "Zephyr",
            "Reveal the top card of each tableau pile.",
            GodEffect::RevealTops,
            7,
        ),
        god(CHRONOS, "Chronos", "+30s this round.", GodEffect::TimePlus, 8),
        god(
            ATHENA,
            "Athena",
            "Double the next foundation move.",
            GodEffect::DoubleNext,
            9,
        ),
        god(
            ARES,
            "Ares",
            "Patron of Pillars: rank up foundation scoring.",
            GodEffect::RankUpFoundation,
            9,
        ),
        god(
            HERMES,
            "Hermes",
            "Keeper of Secrets: rank up reveal scoring.",
            GodEffect::RankUpReveal,
            9,
        ),
        god(
            HESTIA,
            "Hestia",
            "Warden of the Void: rank up empty column scoring.",
            GodEffect::RankUpEmpty,
            9,
        ),
    ]
}

/// Immutable lookup tables for jokers, bosses and god cards, built once at startup.
#[derive(Debug, Clone)]
pub struct Content {
    pub jokers: Vec<JokerDef>,
    pub bosses: Vec<BossDef>,
    pub gods: Vec<GodDef>,
}

impl Content {
    pub fn builtin() -> Self {
        Self {
            jokers: builtin_jokers(),
            bosses: builtin_bosses(),
            gods: builtin_gods(),
        }
    }

    pub fn joker_by_id(&self, id: &str) -> Option<&JokerDef> {
        self.jokers.iter().find(|joker| joker.id == id)
    }

    pub fn boss_by_id(&self, id: &str) -> Option<&BossDef> {
        self.bosses.iter().find(|boss| boss.id == id)
    }

    pub fn god_by_id(&self, id: &str) -> Option<&GodDef> {
        self.gods.iter().find(|god| god.card.id == id)
    }

    /// Rehydrates equipped jokers. Unknown ids are skipped with a warning.
    pub fn activate_jokers(&self, equipped: &[EquippedJoker]) -> Vec<ActiveJoker> {
        equipped
            .iter()
            .filter_map(|joker| match self.joker_by_id(&joker.id) {
                Some(def) => Some(ActiveJoker::new(def.clone(), joker.variant)),
                None => {
                    warn!(id = %joker.id, "skipping unknown joker");
                    None
                }
            })
            .collect()
    }

    /// The boss modifiers of an ante's boss blind.
    pub fn bosses_for_round(&self, ante: u32) -> Vec<BossDef> {
        self.boss_by_id(boss_id_for_ante(ante))
            .cloned()
            .into_iter()
            .collect()
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::builtin()
    }
}
