//! Durable key-value persistence for the store: one JSON snapshot at a fixed
//! namespace under the data directory, written atomically (temp file + rename)
//! so a crash mid-write never corrupts a previously saved session.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::StoreState;

/// Fixed persistence namespace.
const NAMESPACE: &str = "crisp-root.json";

pub fn namespace_path(data_dir: &Path) -> PathBuf {
    data_dir.join(NAMESPACE)
}

pub fn load(path: &Path) -> Result<Option<StoreState>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading store snapshot {}", path.display()))?;
    let state = serde_json::from_str(&raw)
        .with_context(|| format!("parsing store snapshot {}", path.display()))?;
    Ok(Some(state))
}

pub fn save(path: &Path, state: &StoreState) -> Result<()> {
    let dir = path.parent().context("snapshot path has no parent")?;
    fs::create_dir_all(dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).context("creating temp snapshot")?;
    serde_json::to_writer_pretty(&mut tmp, state).context("serializing store snapshot")?;
    tmp.flush().context("flushing store snapshot")?;
    tmp.persist(path)
        .with_context(|| format!("replacing store snapshot {}", path.display()))?;
    Ok(())
}

pub fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing store snapshot {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::Stage;
    use crate::store::Store;

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = namespace_path(dir.path());

        let mut state = StoreState::default();
        state.session.stage = Stage::Completed;
        state.ui.dark_mode = true;
        save(&path, &state).unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.session.stage, Stage::Completed);
        assert!(loaded.ui.dark_mode);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&namespace_path(dir.path())).unwrap().is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = namespace_path(dir.path());
        save(&path, &StoreState::default()).unwrap();
        remove(&path).unwrap();
        remove(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_unfinished_session_loads_paused() {
        let dir = tempfile::tempdir().unwrap();
        let path = namespace_path(dir.path());

        let mut state = StoreState::default();
        state.session.stage = Stage::InProgress;
        state.session.paused = false;
        save(&path, &state).unwrap();

        let store = Store::load_or_default(dir.path()).unwrap();
        assert!(store.read().session.paused);
        assert_eq!(store.read().session.stage, Stage::InProgress);
    }

    #[test]
    fn test_store_mutate_persists_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::load_or_default(dir.path()).unwrap();
        store.mutate(|s| s.ui.dark_mode = true);

        let reloaded = load(&namespace_path(dir.path())).unwrap().unwrap();
        assert!(reloaded.ui.dark_mode);
    }

    #[test]
    fn test_purge_wipes_disk_and_memory() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::load_or_default(dir.path()).unwrap();
        store.mutate(|s| s.session.stage = Stage::Completed);
        store.purge().unwrap();

        assert_eq!(store.read().session.stage, Stage::Idle);
        assert!(!namespace_path(dir.path()).exists());
    }
}
