use crate::{
    save_run, ActiveJoker, BlindKind, BossDef, ConfigError, Content, Difficulty, EquippedJoker,
    GameConfig, GodCard, IllegalMove, InventoryError, JokerContext, MemoryStore, Patron,
    RngSnapshot, RngState, RoundEffect, RoundOutcome, RoundState, RunMode, SaveError, SaveStore,
    ScoreCategory, ScoreRanks, ShopState, Veto,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

mod blind;
mod consumables;
mod play;
mod shop;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("no run in progress")]
    NoRun,
    #[error("run is over")]
    GameOver,
    #[error("no active round")]
    NoActiveRound,
    #[error("round already finished")]
    RoundFinished,
    #[error("a round is still in progress")]
    RoundInProgress,
    #[error("no saved run")]
    NoSavedRun,
    #[error("no redeals left")]
    NoRedeals,
    #[error("not enough coins: need {need}, have {have}")]
    NotEnoughCoins { need: i64, have: i64 },
    #[error("shop not available")]
    ShopClosed,
    #[error("unknown shop offer: {0}")]
    UnknownOffer(String),
    #[error("unknown god card: {0}")]
    UnknownGod(String),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub ante: u32,
    pub score: i64,
}

/// The persisted part of an attempt. Written after every mutating action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    pub seed: String,
    pub ante: u32,
    pub coins: i64,
    #[serde(default)]
    pub jokers: Vec<EquippedJoker>,
    /// Boss ids active on the latest boss board.
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub rng: RngSnapshot,
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub god_cards: Vec<GodCard>,
    #[serde(default)]
    pub score_ranks: ScoreRanks,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub score_rank_patrons: BTreeMap<ScoreCategory, Patron>,
}

impl RunState {
    pub fn new(seed: &str, mode: RunMode, difficulty: Difficulty) -> Self {
        Self {
            seed: seed.to_string(),
            ante: 1,
            coins: 0,
            jokers: Vec::new(),
            modifiers: Vec::new(),
            stats: BTreeMap::new(),
            history: Vec::new(),
            rng: RngState::new(seed).snapshot(),
            mode,
            difficulty,
            god_cards: Vec::new(),
            score_ranks: ScoreRanks::default(),
            score_rank_patrons: BTreeMap::new(),
        }
    }

    /// Boards already finished in the current ante.
    pub fn boards_done_in_ante(&self) -> usize {
        self.history
            .iter()
            .filter(|entry| entry.ante == self.ante)
            .count()
    }

    pub fn bump_stat(&mut self, key: &str) {
        *self.stats.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn joker_ctx(&self) -> JokerContext {
        JokerContext {
            ante: self.ante,
            seed: self.seed.clone(),
        }
    }
}

/// Round lifecycle. Only `Dealt` and `InProgress` accept moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Dealt,
    InProgress,
    Succeeded,
    Failed,
    TimedOut,
}

impl RoundPhase {
    pub fn accepts_moves(self) -> bool {
        matches!(self, RoundPhase::Dealt | RoundPhase::InProgress)
    }
}

#[derive(Debug, Clone)]
pub struct ActiveRound {
    pub state: RoundState,
    pub blind: BlindKind,
    /// Difficulty-scaled boss modifiers; empty off boss blinds.
    pub bosses: Vec<BossDef>,
    pub phase: RoundPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied { delta: i64 },
    Illegal(IllegalMove),
    Vetoed(Veto),
    /// Illegal, but waved through by Tactician; the board is unchanged.
    Forgiven(IllegalMove),
}

/// Drives one attempt: rounds, shop and consumables over a [`RunState`].
pub struct Session {
    pub config: GameConfig,
    pub content: Content,
    store: Box<dyn SaveStore>,
    pub run: Option<RunState>,
    pub round: Option<ActiveRound>,
    pub blind_index: usize,
    pub shop: Option<ShopState>,
    pub pending_effects: Vec<RoundEffect>,
    pub skipped_small: bool,
    pub skipped_big: bool,
    /// Coins owed for skipped boards, paid at the next completion.
    pub skip_bonus_bank: i64,
    pub paused: bool,
    pub game_over: bool,
    pub last_outcome: Option<RoundOutcome>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("run", &self.run)
            .field("round", &self.round)
            .field("blind_index", &self.blind_index)
            .field("shop", &self.shop)
            .field("game_over", &self.game_over)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(content: Content, config: GameConfig, store: Box<dyn SaveStore>) -> Self {
        Self {
            config,
            content,
            store,
            run: None,
            round: None,
            blind_index: 0,
            shop: None,
            pending_effects: Vec::new(),
            skipped_small: false,
            skipped_big: false,
            skip_bonus_bank: 0,
            paused: false,
            game_over: false,
            last_outcome: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Content::builtin(),
            GameConfig::default(),
            Box::new(MemoryStore::new()),
        )
    }

    pub fn store(&self) -> &dyn SaveStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn SaveStore {
        self.store.as_mut()
    }

    pub fn run(&self) -> Result<&RunState, RunError> {
        self.run.as_ref().ok_or(RunError::NoRun)
    }

    pub fn current_blind(&self) -> BlindKind {
        BlindKind::from_index(self.blind_index)
    }

    /// The board in play, if it still accepts moves.
    pub fn live_round(&self) -> Option<&RoundState> {
        self.round
            .as_ref()
            .filter(|round| round.phase.accepts_moves())
            .map(|round| &round.state)
    }

    pub(crate) fn active_jokers(&self) -> Vec<ActiveJoker> {
        self.run
            .as_ref()
            .map(|run| self.content.activate_jokers(&run.jokers))
            .unwrap_or_default()
    }

    pub(crate) fn persist(&mut self) -> Result<(), RunError> {
        if let Some(run) = self.run.as_ref() {
            save_run(self.store.as_mut(), run)?;
        }
        Ok(())
    }

    fn reset_progress(&mut self) {
        self.round = None;
        self.blind_index = 0;
        self.shop = None;
        self.pending_effects.clear();
        self.skipped_small = false;
        self.skipped_big = false;
        self.skip_bonus_bank = 0;
        self.paused = false;
        self.game_over = false;
        self.last_outcome = None;
    }

    fn live_round_mut(&mut self) -> Result<&mut ActiveRound, RunError> {
        let round = self.round.as_mut().ok_or(RunError::NoActiveRound)?;
        if !round.phase.accepts_moves() {
            return Err(RunError::RoundFinished);
        }
        Ok(round)
    }

    fn require_live_run(&self) -> Result<(), RunError> {
        self.run()?;
        if self.game_over {
            return Err(RunError::GameOver);
        }
        Ok(())
    }

    fn spend(&mut self, cost: i64) -> Result<(), RunError> {
        let run = self.run.as_mut().ok_or(RunError::NoRun)?;
        if run.coins < cost {
            return Err(RunError::NotEnoughCoins {
                need: cost,
                have: run.coins,
            });
        }
        run.coins -= cost;
        Ok(())
    }
}
