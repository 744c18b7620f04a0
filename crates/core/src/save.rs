use crate::RunState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use time::Date;
use tracing::warn;

pub const SAVE_KEY: &str = "supersolitaire.save.v2";
pub const LEGACY_SAVE_KEY: &str = "supersolitaire.save.v1";
pub const DAILY_BEST_KEY: &str = "supersolitaire.daily.v1";
pub const DAILY_PLAYED_KEY: &str = "supersolitaire.daily.played.v1";
pub const SAVE_VERSION: u64 = 2;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u64),
    #[error("save payload has no run")]
    MissingRun,
    #[error("save store failed: {0}")]
    Store(String),
}

/// Key/blob storage the session persists through.
pub trait SaveStore: Send {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn write(&mut self, key: &str, blob: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Serialize)]
struct SavePayload<'a> {
    v: u64,
    run: &'a RunState,
}

pub fn encode_run(run: &RunState) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&SavePayload {
        v: SAVE_VERSION,
        run,
    })?)
}

/// Reads any known payload shape: `{v:2, run}`, legacy `{v:1, run}` with
/// full joker objects or bare ids, and unversioned raw runs.
pub fn decode_run(blob: &str) -> Result<RunState, SaveError> {
    let value: Value = serde_json::from_str(blob)?;
    let run = match value.get("v").and_then(Value::as_u64) {
        Some(version) if version > SAVE_VERSION => {
            return Err(SaveError::UnsupportedVersion(version));
        }
        Some(_) => value.get("run").cloned().ok_or(SaveError::MissingRun)?,
        None => value,
    };
    Ok(serde_json::from_value(normalize_run(run))?)
}

/// Slims jokers to `{id, variant?}` and boss modifiers to ids.
fn normalize_run(mut run: Value) -> Value {
    let Some(fields) = run.as_object_mut() else {
        return run;
    };
    if let Some(Value::Array(jokers)) = fields.get_mut("jokers") {
        let slim: Vec<Value> = jokers.iter().filter_map(slim_joker).collect();
        *jokers = slim;
    }
    if let Some(Value::Array(modifiers)) = fields.get_mut("modifiers") {
        let ids: Vec<Value> = modifiers
            .iter()
            .filter_map(|entry| entry_id(entry).map(Value::from))
            .collect();
        *modifiers = ids;
    }
    run
}

fn entry_id(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(id) => Some(id),
        Value::Object(fields) => fields.get("id").and_then(Value::as_str),
        _ => None,
    }
}

fn slim_joker(entry: &Value) -> Option<Value> {
    let id = entry_id(entry)?;
    let mut slim = Map::new();
    slim.insert("id".to_string(), json!(id));
    if let Some(variant) = entry.get("variant").filter(|variant| variant.is_string()) {
        slim.insert("variant".to_string(), variant.clone());
    }
    Some(Value::Object(slim))
}

pub fn save_run(store: &mut dyn SaveStore, run: &RunState) -> Result<(), SaveError> {
    store.write(SAVE_KEY, &encode_run(run)?)
}

/// The saved run, if one exists and parses. Corrupt data reads as no save.
pub fn load_run(store: &dyn SaveStore) -> Option<RunState> {
    let blob = match read_first(store, &[SAVE_KEY, LEGACY_SAVE_KEY]) {
        Ok(blob) => blob?,
        Err(err) => {
            warn!(%err, "save store unreadable");
            return None;
        }
    };
    match decode_run(&blob) {
        Ok(run) => Some(run),
        Err(err) => {
            warn!(%err, "discarding corrupt save");
            None
        }
    }
}

pub fn clear_run(store: &mut dyn SaveStore) -> Result<(), SaveError> {
    store.remove(SAVE_KEY)?;
    store.remove(LEGACY_SAVE_KEY)
}

fn read_first(store: &dyn SaveStore, keys: &[&str]) -> Result<Option<String>, SaveError> {
    for key in keys {
        if let Some(blob) = store.read(key)? {
            return Ok(Some(blob));
        }
    }
    Ok(None)
}

fn read_map<T: DeserializeOwned>(store: &dyn SaveStore, key: &str) -> BTreeMap<String, T> {
    let parsed = store
        .read(key)
        .and_then(|blob| match blob {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(BTreeMap::new()),
        });
    parsed.unwrap_or_else(|err| {
        warn!(key, %err, "ignoring unreadable daily record");
        BTreeMap::new()
    })
}

fn write_map<T: Serialize>(
    store: &mut dyn SaveStore,
    key: &str,
    map: &BTreeMap<String, T>,
) -> Result<(), SaveError> {
    store.write(key, &serde_json::to_string(map)?)
}

/// Seed shared by everyone playing on `date` (UTC).
pub fn daily_seed(date: Date) -> String {
    format!(
        "daily-{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub fn is_daily_seed(seed: &str) -> bool {
    seed.starts_with("daily-")
}

pub fn daily_best(store: &dyn SaveStore, seed: &str) -> Option<i64> {
    read_map::<i64>(store, DAILY_BEST_KEY).get(seed).copied()
}

/// Stores `score` if it beats the recorded best. Returns whether it did.
pub fn record_daily_best(
    store: &mut dyn SaveStore,
    seed: &str,
    score: i64,
) -> Result<bool, SaveError> {
    let mut map = read_map::<i64>(store, DAILY_BEST_KEY);
    if map.get(seed).is_some_and(|best| *best >= score) {
        return Ok(false);
    }
    map.insert(seed.to_string(), score);
    write_map(store, DAILY_BEST_KEY, &map)?;
    Ok(true)
}

pub fn has_daily_played(store: &dyn SaveStore, seed: &str) -> bool {
    read_map::<bool>(store, DAILY_PLAYED_KEY)
        .get(seed)
        .copied()
        .unwrap_or(false)
}

pub fn mark_daily_played(store: &mut dyn SaveStore, seed: &str) -> Result<(), SaveError> {
    let mut map = read_map::<bool>(store, DAILY_PLAYED_KEY);
    map.insert(seed.to_string(), true);
    write_map(store, DAILY_PLAYED_KEY, &map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, JokerVariant, RunMode};
    use time::Month;

    fn sample_run() -> RunState {
        let mut run = RunState::new("save-seed", RunMode::Standard, Difficulty::Medium);
        run.jokers.push(crate::EquippedJoker::new("early-bird", None));
        run.jokers
            .push(crate::EquippedJoker::new("monochrome", Some(JokerVariant::Foil)));
        run
    }

    #[test]
    fn v2_payload_keeps_ids_and_variants_only() {
        let blob = encode_run(&sample_run()).expect("encode");
        let value: Value = serde_json::from_str(&blob).expect("json");
        assert_eq!(value["v"], 2);
        assert_eq!(value["run"]["jokers"][0]["id"], "early-bird");
        assert!(value["run"]["jokers"][0].get("name").is_none());
        assert_eq!(value["run"]["jokers"][1]["variant"], "foil");
        assert_eq!(decode_run(&blob).expect("decode"), sample_run());
    }

    #[test]
    fn v1_id_array_is_migrated() {
        let blob = r#"{"v":1,"run":{"seed":"old","ante":2,"coins":7,
            "jokers":["snap","cascade"],"modifiers":[],"stats":{},"history":[],
            "rng":{"seed":"old","value":0},"godCards":[],
            "scoreRanks":{"foundation_move":1,"reveal_face_down":1,"empty_column":1}}}"#;
        let run = decode_run(blob).expect("decode");
        let ids: Vec<&str> = run.jokers.iter().map(|joker| joker.id.as_str()).collect();
        assert_eq!(ids, vec!["snap", "cascade"]);
        assert_eq!(run.ante, 2);
        assert_eq!(run.mode, RunMode::Standard);
    }

    #[test]
    fn v1_full_joker_objects_are_slimmed() {
        let blob = r#"{"v":1,"run":{"seed":"old","ante":1,"coins":0,
            "jokers":[{"id":"tempo","name":"Tempo","rarity":"uncommon","variant":"holo"}],
            "modifiers":[{"id":"red-alert","name":"Red Alert"}],"stats":{},"history":[],
            "rng":{"seed":"old","value":0},"godCards":[],
            "scoreRanks":{"foundation_move":1.2,"reveal_face_down":1,"empty_column":1}}}"#;
        let run = decode_run(blob).expect("decode");
        assert_eq!(run.jokers[0].id, "tempo");
        assert_eq!(run.jokers[0].variant, Some(JokerVariant::Holo));
        assert_eq!(run.modifiers, vec!["red-alert".to_string()]);
    }

    #[test]
    fn corrupt_save_reads_as_none() {
        let mut store = MemoryStore::new();
        store.write(SAVE_KEY, "{not json").expect("write");
        assert!(load_run(&store).is_none());
    }

    #[test]
    fn future_version_is_rejected() {
        assert!(matches!(
            decode_run(r#"{"v":9,"run":{}}"#),
            Err(SaveError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn legacy_key_is_a_fallback() {
        let mut store = MemoryStore::new();
        store
            .write(LEGACY_SAVE_KEY, &encode_run(&sample_run()).expect("encode"))
            .expect("write");
        assert_eq!(load_run(&store), Some(sample_run()));
    }

    #[test]
    fn daily_best_only_improves() {
        let mut store = MemoryStore::new();
        assert!(record_daily_best(&mut store, "daily-2024-01-02", 900).expect("record"));
        assert!(!record_daily_best(&mut store, "daily-2024-01-02", 400).expect("record"));
        assert_eq!(daily_best(&store, "daily-2024-01-02"), Some(900));
        assert_eq!(daily_best(&store, "daily-2024-01-03"), None);
    }

    #[test]
    fn daily_played_flags_by_seed() {
        let mut store = MemoryStore::new();
        mark_daily_played(&mut store, "daily-2024-01-02").expect("mark");
        assert!(has_daily_played(&store, "daily-2024-01-02"));
        assert!(!has_daily_played(&store, "daily-2024-01-03"));
    }

    #[test]
    fn daily_seed_is_zero_padded() {
        let date = Date::from_calendar_date(2024, Month::March, 5).expect("date");
        assert_eq!(daily_seed(date), "daily-2024-03-05");
        assert!(is_daily_seed(&daily_seed(date)));
    }
}
