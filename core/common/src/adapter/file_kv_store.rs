//! JSON オブジェクト 1 ファイルに保存するキー・値ストア
//!
//! 形式: `{"<key>": "<value>", ...}`。書き込みは一時ファイル経由の rename で置き換える。

use crate::error::Error;
use crate::ports::outbound::{FileSystem, KeyValueStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// storage.json に永続化する KeyValueStore 実装
pub struct FileKeyValueStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    /// 初回アクセス時に読み込んだ内容（以降は書き込みのたびに全体を書き戻す）
    cache: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileKeyValueStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            cache: Mutex::new(None),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(BTreeMap::new());
        }
        let s = self.fs.read_to_string(&self.path)?;
        if s.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&s).map_err(|e| {
            Error::json(format!(
                "Failed to parse '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    fn persist(&self, map: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map).map_err(|e| Error::json(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        self.fs.write(&tmp, &json)?;
        self.fs.rename(&tmp, &self.path)
    }

    fn with_map<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut guard = self
            .cache
            .lock()
            .map_err(|_| Error::system("storage lock poisoned"))?;
        if guard.is_none() {
            *guard = Some(self.load()?);
        }
        match guard.as_mut() {
            Some(map) => f(map),
            None => Err(Error::system("storage cache missing")),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.with_map(|m| Ok(m.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.with_map(|m| {
            m.insert(key.to_string(), value.to_string());
            self.persist(m)
        })
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.with_map(|m| {
            if m.remove(key).is_some() {
                self.persist(m)?;
            }
            Ok(())
        })
    }
}
