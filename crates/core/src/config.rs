use crate::{BlindKind, Difficulty, JokerRarity, RoundConfig, ScoringRules};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnteRule {
    pub ante: u32,
    pub target: i64,
    pub time_sec: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BlindRule {
    pub kind: BlindKind,
    pub target_mult: f64,
    pub timer_mult: f64,
    pub min_coins: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DifficultyRule {
    pub difficulty: Difficulty,
    pub target_scale: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RarityRule {
    pub rarity: JokerRarity,
    pub weight: u32,
    pub price: PriceRange,
    /// Mean shop price; selling refunds a share of it.
    pub average_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomyRule {
    pub success_coin_divisor: i64,
    pub failure_coin_divisor: i64,
    pub bonus_points_per_coin: i64,
    pub perfect_clear_coins: i64,
    pub skip_bonus_single: i64,
    pub skip_bonus_double: i64,
    pub rank_up_cost: i64,
    pub rank_step: f64,
    pub reroll_cost: i64,
    pub joker_slots: usize,
    pub sell_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopRule {
    pub slots: usize,
    pub rarities: Vec<RarityRule>,
    pub foil_bump: i64,
    pub holo_bump: i64,
    pub foil_chance: f64,
    pub holo_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub antes: Vec<AnteRule>,
    pub duration_factor: i64,
    pub base_redeals: i64,
    pub deal_size: usize,
    pub timer_floor_sec: i64,
    pub difficulties: Vec<DifficultyRule>,
    pub blinds: Vec<BlindRule>,
    #[serde(default)]
    pub scoring: ScoringRules,
    pub economy: EconomyRule,
    pub shop: ShopRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing config for ante {0}")]
    MissingAnteRule(u32),
    #[error("missing config for blind {0}")]
    MissingBlindRule(BlindKind),
    #[error("missing config for rarity {0:?}")]
    MissingRarityRule(JokerRarity),
}

const ANTE_TABLE: [(i64, i64); 8] = [
    (500, 120),
    (650, 120),
    (800, 130),
    (1000, 140),
    (1200, 140),
    (1450, 150),
    (1700, 150),
    (2000, 160),
];

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            antes: ANTE_TABLE
                .iter()
                .enumerate()
                .map(|(idx, (target, time_sec))| AnteRule {
                    ante: idx as u32 + 1,
                    target: *target,
                    time_sec: *time_sec,
                })
                .collect(),
            duration_factor: 3,
            base_redeals: 2,
            deal_size: 3,
            timer_floor_sec: 30,
            difficulties: vec![
                DifficultyRule {
                    difficulty: Difficulty::Easy,
                    target_scale: 0.85,
                },
                DifficultyRule {
                    difficulty: Difficulty::Medium,
                    target_scale: 1.0,
                },
                DifficultyRule {
                    difficulty: Difficulty::Hard,
                    target_scale: 1.35,
                },
            ],
            blinds: vec![
                BlindRule {
                    kind: BlindKind::Small,
                    target_mult: 1.0,
                    timer_mult: 1.0,
                    min_coins: 8,
                },
                BlindRule {
                    kind: BlindKind::Big,
                    target_mult: 1.25,
                    timer_mult: 0.95,
                    min_coins: 10,
                },
                BlindRule {
                    kind: BlindKind::Boss,
                    target_mult: 1.0,
                    timer_mult: 0.9,
                    min_coins: 12,
                },
            ],
            scoring: ScoringRules::DEFAULT,
            economy: EconomyRule {
                success_coin_divisor: 100,
                failure_coin_divisor: 200,
                bonus_points_per_coin: 50,
                perfect_clear_coins: 5,
                skip_bonus_single: 3,
                skip_bonus_double: 8,
                rank_up_cost: 5,
                rank_step: 0.1,
                reroll_cost: 3,
                joker_slots: 5,
                sell_ratio: 0.5,
            },
            shop: ShopRule {
                slots: 3,
                rarities: vec![
                    rarity(JokerRarity::Common, 60, 3, 6, 4.0),
                    rarity(JokerRarity::Uncommon, 28, 6, 9, 7.0),
                    rarity(JokerRarity::Rare, 10, 10, 14, 12.0),
                    rarity(JokerRarity::Legendary, 2, 18, 22, 20.0),
                ],
                foil_bump: 3,
                holo_bump: 6,
                foil_chance: 0.15,
                holo_chance: 0.05,
            },
        }
    }
}

fn rarity(rarity: JokerRarity, weight: u32, min: i64, max: i64, average_price: f64) -> RarityRule {
    RarityRule {
        rarity,
        weight,
        price: PriceRange { min, max },
        average_price,
    }
}

impl GameConfig {
    pub fn blind_rule(&self, kind: BlindKind) -> Result<&BlindRule, ConfigError> {
        self.blinds
            .iter()
            .find(|rule| rule.kind == kind)
            .ok_or(ConfigError::MissingBlindRule(kind))
    }

    /// Antes past the table reuse its last row.
    pub fn ante_rule(&self, ante: u32) -> Result<&AnteRule, ConfigError> {
        let max = self.max_ante().ok_or(ConfigError::MissingAnteRule(ante))?;
        let clamped = ante.clamp(1, max);
        self.antes
            .iter()
            .find(|rule| rule.ante == clamped)
            .ok_or(ConfigError::MissingAnteRule(clamped))
    }

    pub fn max_ante(&self) -> Option<u32> {
        self.antes.iter().map(|rule| rule.ante).max()
    }

    pub fn target_scale(&self, difficulty: Difficulty) -> f64 {
        self.difficulties
            .iter()
            .find(|rule| rule.difficulty == difficulty)
            .map_or(1.0, |rule| rule.target_scale)
    }

    pub fn rarity_rule(&self, rarity: JokerRarity) -> Result<&RarityRule, ConfigError> {
        self.shop
            .rarities
            .iter()
            .find(|rule| rule.rarity == rarity)
            .ok_or(ConfigError::MissingRarityRule(rarity))
    }

    pub fn rarity_weight(&self, rarity: JokerRarity) -> u32 {
        self.rarity_rule(rarity).map_or(1, |rule| rule.weight)
    }

    /// Base round parameters for an ante before blind and modifier adjustments.
    pub fn round_config(
        &self,
        ante: u32,
        difficulty: Difficulty,
    ) -> Result<RoundConfig, ConfigError> {
        let rule = self.ante_rule(ante)?;
        Ok(RoundConfig {
            target_score: (rule.target as f64 * self.target_scale(difficulty)).round() as i64,
            time_limit_sec: rule.time_sec * self.duration_factor,
            redeals: self.base_redeals,
            deal_size: self.deal_size,
        })
    }

    pub fn sell_refund(&self, rarity: JokerRarity) -> i64 {
        let average = self.rarity_rule(rarity).map_or(5.0, |rule| rule.average_price);
        (average * self.economy.sell_ratio).floor() as i64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.antes.is_empty() {
            return Err(ConfigError::MissingAnteRule(1));
        }
        for kind in BlindKind::ALL {
            self.blind_rule(kind)?;
        }
        for rarity in JokerRarity::ALL {
            self.rarity_rule(rarity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ante_lookup_clamps_to_table() {
        let config = GameConfig::default();
        assert_eq!(config.ante_rule(0).map(|rule| rule.ante), Ok(1));
        assert_eq!(config.ante_rule(12).map(|rule| rule.ante), Ok(8));
    }

    #[test]
    fn round_config_scales_by_difficulty() {
        let config = GameConfig::default();
        let easy = config.round_config(1, Difficulty::Easy).expect("config");
        let hard = config.round_config(1, Difficulty::Hard).expect("config");
        assert_eq!(easy.target_score, 425);
        assert_eq!(hard.target_score, 675);
        assert_eq!(easy.time_limit_sec, 360);
        assert_eq!(hard.redeals, 2);
        assert_eq!(hard.deal_size, 3);
    }

    #[test]
    fn refund_is_half_the_average_price() {
        let config = GameConfig::default();
        assert_eq!(config.sell_refund(JokerRarity::Common), 2);
        assert_eq!(config.sell_refund(JokerRarity::Legendary), 10);
    }

    #[test]
    fn default_config_validates() {
        assert!(GameConfig::default().validate().is_ok());
    }
}
