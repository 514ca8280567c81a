//! 按文件路径缓存解析结果
//!
//! 两种读取模式:
//! - `read_once`: 首次成功解析后永久缓存，之后不再访问文件系统
//! - `read_newer`: 文件修改时间严格晚于上次解析时重新读取
//!
//! 同一路径上并发的加载共享一个 `Shared` future，只读取和解析一次。
//! 失败不会被缓存，下一次调用会重新读取。

use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chainrest_core::NetworkError;
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileCacheError {
    #[error("读取文件失败: {path} - {message}")]
    Read { path: String, message: String },

    #[error("解析文件失败: {path} - {message}")]
    Parse { path: String, message: String },
}

impl FileCacheError {
    fn read(path: &Path, message: impl Display) -> Self {
        Self::Read {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    fn parse(path: &Path, message: impl Display) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl From<FileCacheError> for NetworkError {
    fn from(err: FileCacheError) -> Self {
        match err {
            FileCacheError::Read { path, message } => NetworkError::FileRead { path, message },
            FileCacheError::Parse { path, message } => NetworkError::FileParse { path, message },
        }
    }
}

pub type FileCacheResult<T> = Result<Arc<T>, FileCacheError>;

type PendingLoad<T> = Shared<BoxFuture<'static, FileCacheResult<T>>>;

struct PendingRead<T> {
    /// `None` 表示 once 模式的加载
    modified: Option<SystemTime>,
    load: PendingLoad<T>,
}

struct CachedFile<T> {
    modified: Option<SystemTime>,
    value: Option<Arc<T>>,
    pending: Option<PendingRead<T>>,
}

impl<T> CachedFile<T> {
    fn new() -> Self {
        Self {
            modified: None,
            value: None,
            pending: None,
        }
    }
}

/// 文件缓存
pub struct FileCache<T> {
    entries: Mutex<HashMap<PathBuf, CachedFile<T>>>,
}

impl<T> Default for FileCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> FileCache<T>
where
    T: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 首次成功解析后永久返回同一结果
    pub async fn read_once<P, F, E>(&self, path: P, parse: F) -> FileCacheResult<T>
    where
        P: AsRef<Path>,
        F: FnOnce(&str) -> Result<T, E> + Send + 'static,
        E: Display + Send + 'static,
    {
        let path = path.as_ref().to_path_buf();

        let load = {
            let mut entries = self.entries.lock().await;
            let entry = entries
                .entry(path.clone())
                .or_insert_with(CachedFile::new);

            if let Some(value) = &entry.value {
                return Ok(value.clone());
            }

            match &entry.pending {
                Some(pending) => pending.load.clone(),
                None => {
                    let load = Self::start_load(path.clone(), parse);
                    entry.pending = Some(PendingRead {
                        modified: None,
                        load: load.clone(),
                    });
                    load
                }
            }
        };

        let result = load.clone().await;
        self.settle(&path, &load, None, &result).await;
        result
    }

    /// 文件修改时间严格晚于缓存时重新解析，否则返回缓存结果
    pub async fn read_newer<P, F, E>(&self, path: P, parse: F) -> FileCacheResult<T>
    where
        P: AsRef<Path>,
        F: FnOnce(&str) -> Result<T, E> + Send + 'static,
        E: Display + Send + 'static,
    {
        let path = path.as_ref().to_path_buf();
        let modified = Some(file_modified(&path).await?);

        let load = {
            let mut entries = self.entries.lock().await;
            let entry = entries
                .entry(path.clone())
                .or_insert_with(CachedFile::new);

            if let Some(value) = &entry.value {
                if entry.modified >= modified {
                    return Ok(value.clone());
                }
            }

            match &entry.pending {
                Some(pending) if pending.modified >= modified => pending.load.clone(),
                _ => {
                    debug!("文件已更新，重新加载: {}", path.display());
                    let load = Self::start_load(path.clone(), parse);
                    entry.pending = Some(PendingRead {
                        modified,
                        load: load.clone(),
                    });
                    load
                }
            }
        };

        let result = load.clone().await;
        self.settle(&path, &load, modified, &result).await;
        result
    }

    fn start_load<F, E>(path: PathBuf, parse: F) -> PendingLoad<T>
    where
        F: FnOnce(&str) -> Result<T, E> + Send + 'static,
        E: Display + Send + 'static,
    {
        async move {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| FileCacheError::read(&path, e))?;

            let value = parse(&text).map_err(|e| FileCacheError::parse(&path, e))?;
            debug!("文件解析完成: {}", path.display());
            Ok(Arc::new(value))
        }
        .boxed()
        .shared()
    }

    async fn settle(
        &self,
        path: &Path,
        load: &PendingLoad<T>,
        modified: Option<SystemTime>,
        result: &FileCacheResult<T>,
    ) {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get_mut(path) else {
            return;
        };

        if entry
            .pending
            .as_ref()
            .is_some_and(|pending| pending.load.ptr_eq(load))
        {
            entry.pending = None;
        }

        let Ok(value) = result else {
            return;
        };

        let replace = match (&entry.value, modified) {
            (None, _) => true,
            // once 模式的结果一经写入不再替换
            (Some(_), None) => false,
            (Some(_), Some(_)) => modified > entry.modified,
        };

        if replace {
            entry.value = Some(value.clone());
            entry.modified = modified;
        }
    }
}

async fn file_modified(path: &Path) -> Result<SystemTime, FileCacheError> {
    tokio::fs::metadata(path)
        .await
        .and_then(|metadata| metadata.modified())
        .map_err(|e| FileCacheError::read(path, e))
}
