use crate::{JokerVariant, ScoreCategory};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A joker as persisted: registry id plus optional variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedJoker {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<JokerVariant>,
}

impl EquippedJoker {
    pub fn new(id: &str, variant: Option<JokerVariant>) -> Self {
        Self {
            id: id.to_string(),
            variant,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GodEffect {
    TimePlus,
    RedealPlus,
    DoubleNext,
    RevealTops,
    RankUpFoundation,
    RankUpReveal,
    RankUpEmpty,
}

impl GodEffect {
    pub fn rank_category(self) -> Option<ScoreCategory> {
        match self {
            GodEffect::RankUpFoundation => Some(ScoreCategory::FoundationMove),
            GodEffect::RankUpReveal => Some(ScoreCategory::RevealFaceDown),
            GodEffect::RankUpEmpty => Some(ScoreCategory::EmptyColumn),
            _ => None,
        }
    }

    /// Effects that only make sense against a round in play.
    pub fn needs_round(self) -> bool {
        matches!(
            self,
            GodEffect::TimePlus
                | GodEffect::RedealPlus
                | GodEffect::DoubleNext
                | GodEffect::RevealTops
        )
    }
}

/// Single-use consumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GodCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub effect: GodEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patron {
    pub god_id: String,
    pub name: String,
    pub title: String,
}

impl Patron {
    pub fn of(god: &GodCard, category: ScoreCategory) -> Self {
        Self {
            god_id: god.id.clone(),
            name: god.name.clone(),
            title: format!("{}, {}", god.name, category.patron_title()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("joker tray full")]
    NoJokerSlots,
    #[error("joker not equipped: {0}")]
    JokerNotEquipped(String),
    #[error("god card not held: {0}")]
    GodCardMissing(String),
}

/// Ordered joker tray with a slot cap.
#[derive(Debug)]
pub struct JokerTray<'a> {
    jokers: &'a mut Vec<EquippedJoker>,
    slots: usize,
}

impl<'a> JokerTray<'a> {
    pub fn new(jokers: &'a mut Vec<EquippedJoker>, slots: usize) -> Self {
        Self { jokers, slots }
    }

    pub fn has_room(&self) -> bool {
        self.jokers.len() < self.slots
    }

    pub fn equip(&mut self, joker: EquippedJoker) -> Result<(), InventoryError> {
        if !self.has_room() {
            return Err(InventoryError::NoJokerSlots);
        }
        self.jokers.push(joker);
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize, InventoryError> {
        self.jokers
            .iter()
            .position(|joker| joker.id == id)
            .ok_or_else(|| InventoryError::JokerNotEquipped(id.to_string()))
    }

    pub fn remove(&mut self, id: &str) -> Result<EquippedJoker, InventoryError> {
        let idx = self.position(id)?;
        Ok(self.jokers.remove(idx))
    }

    /// Moves a joker to `to_index`, clamped to the tray. Returns the final index.
    pub fn reorder(&mut self, id: &str, to_index: usize) -> Result<usize, InventoryError> {
        let from = self.position(id)?;
        let target = to_index.min(self.jokers.len() - 1);
        if from != target {
            let moving = self.jokers.remove(from);
            self.jokers.insert(target, moving);
        }
        Ok(target)
    }
}

pub fn take_god_card(cards: &mut Vec<GodCard>, id: &str) -> Result<GodCard, InventoryError> {
    let idx = cards
        .iter()
        .position(|card| card.id == id)
        .ok_or_else(|| InventoryError::GodCardMissing(id.to_string()))?;
    Ok(cards.remove(idx))
}
