use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use supersolitaire_core::{SaveError, SaveStore};

/// One file per save key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

fn store_error(key: &str, err: io::Error) -> SaveError {
    SaveError::Store(format!("{key}: {err}"))
}

impl SaveStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(store_error(key, err)),
        }
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), SaveError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob).map_err(|err| store_error(key, err))?;
        fs::rename(&tmp, &path).map_err(|err| store_error(key, err))
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(store_error(key, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use supersolitaire_core::{load_run, save_run, Difficulty, RunMode, RunState, SAVE_KEY};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!(
            "supersolitaire-{tag}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn missing_key_reads_none() {
        let dir = scratch_dir("missing");
        let store = FileStore::open(&dir).unwrap();
        assert_eq!(store.read("nothing.here").unwrap(), None);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn write_read_remove() {
        let dir = scratch_dir("cycle");
        let mut store = FileStore::open(&dir).unwrap();
        store.write("a/b key", "{\"x\":1}").unwrap();
        assert_eq!(store.read("a/b key").unwrap().as_deref(), Some("{\"x\":1}"));
        assert!(dir.join("a_b_key.json").exists());
        store.remove("a/b key").unwrap();
        store.remove("a/b key").unwrap();
        assert_eq!(store.read("a/b key").unwrap(), None);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn run_survives_reopen() {
        let dir = scratch_dir("reopen");
        let mut run = RunState::new("file-seed", RunMode::Standard, Difficulty::Hard);
        run.coins = 17;
        {
            let mut store = FileStore::open(&dir).unwrap();
            save_run(&mut store, &run).unwrap();
        }
        let store = FileStore::open(&dir).unwrap();
        assert!(store.read(SAVE_KEY).unwrap().is_some());
        assert_eq!(load_run(&store), Some(run));
        fs::remove_dir_all(dir).ok();
    }
}
