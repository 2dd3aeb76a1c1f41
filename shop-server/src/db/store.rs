//! 集合文件存储
//!
//! 每个集合 (products / carts) 对应一个 JSON 数组文件，
//! 读取时整体加载，写入时整体覆盖。
//!
//! # 写入流程
//!
//! ```text
//! records ──▶ to_string_pretty ──▶ <file>.tmp ──▶ rename ──▶ <file>
//! ```
//!
//! rename 在同一目录内是原子的，写到一半崩溃只会留下 `.tmp`，
//! 已提交的文件保持完整。

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

/// 带数字 ID 的记录
pub trait Record {
    fn id(&self) -> u64;
}

impl Record for shared::models::Product {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for shared::models::Cart {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// 单个集合文件的存储句柄
///
/// Clone 后共享同一把集合锁和 ID 水位线。
#[derive(Debug)]
pub struct RecordStore<T> {
    path: PathBuf,
    /// 集合锁，所有 load-modify-save 序列都在锁内执行
    lock: Arc<Mutex<()>>,
    /// 本进程已分配过的最大 ID
    last_issued: Arc<AtomicU64>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: self.lock.clone(),
            last_issued: self.last_issued.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> RecordStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            last_issued: Arc::new(AtomicU64::new(0)),
            _marker: PhantomData,
        }
    }

    /// 集合文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载整个集合
    ///
    /// 文件不存在、不可读或内容损坏时返回空集合。
    /// 损坏的文件会在下一次成功写入时被覆盖。
    pub async fn load(&self) -> Vec<T> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Collection file absent, starting empty");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Collection file unreadable, treating as empty");
                return Vec::new();
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Vec::new();
        }

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Collection file corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// 整体覆盖写入集合 (pretty JSON, tmp + rename)
    pub async fn save(&self, records: &[T]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.tmp_path();

        if let Err(e) = tokio::fs::write(&tmp, json.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io(&tmp, e));
        }

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io(&self.path, e));
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "Collection saved");
        Ok(())
    }

    /// 获取集合锁
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// 分配下一个 ID: max(现有最大 ID, 已分配水位) + 1
    ///
    /// 需在集合锁内调用。删除最大 ID 的记录后，同一进程内不会再次分配该 ID。
    pub fn next_id(&self, records: &[T]) -> u64 {
        let max_existing = records.iter().map(|r| r.id()).max().unwrap_or(0);
        let next = max_existing.max(self.last_issued.load(Ordering::Acquire)) + 1;
        self.last_issued.fetch_max(next, Ordering::AcqRel);
        next
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
