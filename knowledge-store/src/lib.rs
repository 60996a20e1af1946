//! Knowledge store: the topic→fact mapping every answer is grounded on.
//!
//! - Loaded once from a JSON file; a missing file means an empty mapping.
//! - Readers take an `Arc` snapshot, so a concurrent replace never exposes a
//!   half-written mapping.
//! - [`KnowledgeStore::replace_all`] writes the new mapping to disk first
//!   (temp file + rename) and only then swaps it in. A failed write leaves
//!   both the file and the in-memory mapping untouched.

pub mod errors;

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

pub use errors::{KnowledgeError, Result};

/// Topic → fact mapping. Iteration follows insertion order.
///
/// Values are kept as raw JSON: the admin surface performs no schema
/// validation, so non-string values are stored as given.
pub type KnowledgeBase = IndexMap<String, Value>;

/// Process-wide knowledge mapping backed by a file.
#[derive(Debug)]
pub struct KnowledgeStore {
    path: PathBuf,
    current: RwLock<Arc<KnowledgeBase>>,
    /// Serializes writers so file order matches swap order.
    write_lock: Mutex<()>,
}

impl KnowledgeStore {
    /// Loads the mapping from `path` (see [`load`]) and wraps it in a store.
    ///
    /// # Errors
    /// Fails if the file exists but cannot be read or is not a JSON object.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let kb = load(&path).await?;
        info!(path = %path.display(), entries = kb.len(), "knowledge base loaded");
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(kb)),
            write_lock: Mutex::new(()),
        })
    }

    /// Current mapping. Cheap: clones an `Arc`.
    pub async fn snapshot(&self) -> Arc<KnowledgeBase> {
        self.current.read().await.clone()
    }

    /// Replaces the whole mapping and persists it.
    ///
    /// # Errors
    /// [`KnowledgeError::Io`] / [`KnowledgeError::Serialize`] if the file
    /// cannot be written; the previous mapping stays active in that case.
    #[instrument(skip_all, fields(path = %self.path.display(), entries = kb.len()))]
    pub async fn replace_all(&self, kb: KnowledgeBase) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        persist(&self.path, &kb).await?;
        *self.current.write().await = Arc::new(kb);

        info!("knowledge base replaced");
        Ok(())
    }
}

/// Reads the mapping stored at `path`.
///
/// A missing file yields an empty mapping.
///
/// # Errors
/// [`KnowledgeError::Io`] for other read failures, [`KnowledgeError::Parse`]
/// if the content is not a JSON object.
pub async fn load(path: &Path) -> Result<KnowledgeBase> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "knowledge file not found, starting empty");
            return Ok(KnowledgeBase::new());
        }
        Err(e) => return Err(KnowledgeError::io(path, e)),
    };

    serde_json::from_slice(&bytes).map_err(|source| KnowledgeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `kb` to `path` atomically (sibling temp file + rename).
///
/// Output is a flat JSON object indented with four spaces.
pub async fn persist(path: &Path, kb: &KnowledgeBase) -> Result<()> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    kb.serialize(&mut ser)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| KnowledgeError::io(dir, e))?;
    }

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, &buf)
        .await
        .map_err(|e| KnowledgeError::io(&tmp, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(KnowledgeError::io(path, e));
    }

    debug!(path = %path.display(), bytes = buf.len(), "knowledge file written");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "knowledge_base.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn kb(pairs: &[(&str, Value)]) -> KnowledgeBase {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::open(dir.path().join("kb.json")).await.unwrap();
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn non_object_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err = KnowledgeStore::open(&path).await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }

    #[tokio::test]
    async fn replace_all_persists_and_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        let store = KnowledgeStore::open(&path).await.unwrap();

        let new = kb(&[
            ("shipping", json!("3-5 business days")),
            ("returns", json!("30 days")),
            ("hours", json!("9-5")),
        ]);
        store.replace_all(new.clone()).await.unwrap();

        let snap = store.snapshot().await;
        let keys: Vec<_> = snap.keys().map(String::as_str).collect();
        assert_eq!(keys, ["shipping", "returns", "hours"]);

        let reloaded = load(&path).await.unwrap();
        assert_eq!(reloaded, new);
        let keys: Vec<_> = reloaded.keys().map(String::as_str).collect();
        assert_eq!(keys, ["shipping", "returns", "hours"]);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"shipping\": \"3-5 business days\""));
        assert!(!tmp_path(&path).exists());
    }

    #[tokio::test]
    async fn replace_is_wholesale_not_merge() {
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::open(dir.path().join("kb.json")).await.unwrap();
        store.replace_all(kb(&[("a", json!("1")), ("b", json!("2"))])).await.unwrap();
        store.replace_all(kb(&[("c", json!("3"))])).await.unwrap();

        let snap = store.snapshot().await;
        assert_eq!(snap.len(), 1);
        assert_eq!(snap["c"], json!("3"));
    }

    #[tokio::test]
    async fn empty_mapping_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        let store = KnowledgeStore::open(&path).await.unwrap();
        store.replace_all(kb(&[("x", json!("y"))])).await.unwrap();
        store.replace_all(KnowledgeBase::new()).await.unwrap();

        let first = load(&path).await.unwrap();
        assert!(first.is_empty());

        persist(&path, &first).await.unwrap();
        assert_eq!(load(&path).await.unwrap(), first);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_mapping() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("kb.json");
        let store = KnowledgeStore::open(&path).await.unwrap();
        store.replace_all(kb(&[("keep", json!("me"))])).await.unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let err = store.replace_all(kb(&[("lost", json!("?"))])).await;
        assert!(matches!(err, Err(KnowledgeError::Io { .. })));

        let snap = store.snapshot().await;
        assert_eq!(snap.len(), 1);
        assert_eq!(snap["keep"], json!("me"));
    }

    #[tokio::test]
    async fn snapshot_survives_replace() {
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::open(dir.path().join("kb.json")).await.unwrap();
        store.replace_all(kb(&[("old", json!("v"))])).await.unwrap();

        let before = store.snapshot().await;
        store.replace_all(kb(&[("new", json!("v"))])).await.unwrap();

        assert!(before.contains_key("old"));
        assert!(store.snapshot().await.contains_key("new"));
    }
}
