use crate::{
    BlindKind, Difficulty, GodEffect, IllegalMove, Move, RoundEffect, RoundOutcome, RunMode,
    ScoreCategory,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RunStarted {
        seed: String,
        mode: RunMode,
        difficulty: Difficulty,
    },
    RunResumed {
        seed: String,
        ante: u32,
        blind: BlindKind,
    },
    RoundStarted {
        ante: u32,
        blind: BlindKind,
        target: i64,
        time_sec: i64,
        redeals: i64,
        boss: Option<String>,
    },
    MoveApplied {
        mv: Move,
        delta: i64,
        score: i64,
    },
    MoveRejected {
        mv: Move,
        reason: IllegalMove,
    },
    MoveVetoed {
        mv: Move,
        reason: String,
    },
    MoveForgiven {
        mv: Move,
        reason: IllegalMove,
    },
    HintFound { mv: Option<Move> },
    Redealt { redeals_left: i64 },
    TimedOut,
    Paused { paused: bool },
    RoundCompleted {
        outcome: RoundOutcome,
        skip_bonus: i64,
        coins: i64,
    },
    AnteAdvanced { ante: u32 },
    RunEnded { ante: u32, score: i64 },
    ShopOpened { offers: usize, reroll_cost: i64 },
    ShopRerolled {
        offers: usize,
        cost: i64,
        coins: i64,
    },
    OfferBought {
        offer_id: String,
        cost: i64,
        coins: i64,
    },
    OfferLockToggled { offer_id: String, locked: bool },
    EffectQueued { effect: RoundEffect },
    EffectApplied { effect: RoundEffect },
    JokerEquipped { id: String },
    JokerSold {
        id: String,
        refund: i64,
        coins: i64,
    },
    JokerUnequipped { id: String },
    JokerReordered { id: String, index: usize },
    GodCardGained { id: String },
    GodCardUsed { id: String, effect: GodEffect },
    RankedUp {
        category: ScoreCategory,
        rank: f64,
        coins: i64,
    },
    Info { message: String },
}

impl Event {
    pub fn info(message: impl Into<String>) -> Self {
        Event::Info {
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
