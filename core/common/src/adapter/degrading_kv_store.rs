//! 永続ストアが使えなくなったらメモリへ縮退する KeyValueStore
//!
//! 最初の失敗で警告を 1 度だけログに出し、以降の書き込みはプロセス終了までメモリに置く。
//! 読み込みはメモリ上の変更を優先し、無ければ primary がまだ返せる値を使う。
//! 呼び出し側へはエラーを返さない。

use crate::error::Error;
use crate::ports::outbound::{KeyValueStore, Log, LogLevel, LogRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// 縮退後の変更（None は削除済み）
type Overlay = HashMap<String, Option<String>>;

/// primary が失敗したらメモリ上の差分で動き続けるラッパ
pub struct DegradingKeyValueStore {
    primary: Arc<dyn KeyValueStore>,
    overlay: Mutex<Overlay>,
    degraded: AtomicBool,
    log: Arc<dyn Log>,
}

impl DegradingKeyValueStore {
    pub fn new(primary: Arc<dyn KeyValueStore>, log: Arc<dyn Log>) -> Self {
        Self {
            primary,
            overlay: Mutex::new(HashMap::new()),
            degraded: AtomicBool::new(false),
            log,
        }
    }

    /// メモリ縮退中か
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    fn degrade(&self, op: &str, err: &Error) {
        if !self.degraded.swap(true, Ordering::SeqCst) {
            let _ = self.log.log(
                &LogRecord::new(
                    LogLevel::Warn,
                    "storage unavailable; continuing in memory for this process",
                )
                .layer("adapter")
                .kind("storage")
                .field("op", op)
                .field("error", err.to_string()),
            );
        }
    }

    fn with_overlay<T>(&self, f: impl FnOnce(&mut Overlay) -> T) -> Result<T, Error> {
        let mut guard = self
            .overlay
            .lock()
            .map_err(|_| Error::system("storage overlay lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

impl KeyValueStore for DegradingKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        if self.is_degraded() {
            if let Some(entry) = self.with_overlay(|o| o.get(key).cloned())? {
                return Ok(entry);
            }
        }
        match self.primary.get(key) {
            Ok(v) => Ok(v),
            Err(e) => {
                self.degrade("get", &e);
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        if !self.is_degraded() {
            match self.primary.set(key, value) {
                Ok(()) => return Ok(()),
                Err(e) => self.degrade("set", &e),
            }
        }
        self.with_overlay(|o| {
            o.insert(key.to_string(), Some(value.to_string()));
        })
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        if !self.is_degraded() {
            match self.primary.remove(key) {
                Ok(()) => return Ok(()),
                Err(e) => self.degrade("remove", &e),
            }
        }
        self.with_overlay(|o| {
            o.insert(key.to_string(), None);
        })
    }
}
