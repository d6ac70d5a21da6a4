use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{BotError, BotResult};
use crate::utils::logging::{log_store_error, log_store_operation};

/// A JSON document on disk, guarded by one exclusive lock.
///
/// Every read and every load-mutate-save cycle goes through the same mutex, so
/// callers never observe a half-written collection. Writes go to a temporary
/// sibling file that is synced and then renamed over the original.
pub struct JsonFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` if the file does not exist or is blank.
    pub async fn read(&self) -> BotResult<Option<T>> {
        let _guard = self.lock.lock().await;
        Ok(self.load_raw().await?.map(|(data, _)| data))
    }

    /// Replaces the whole document.
    pub async fn write(&self, data: &T) -> BotResult<()> {
        let _guard = self.lock.lock().await;
        self.save(data).await
    }

    /// Loads the document (or `default()`), applies `f` and writes the result
    /// back if its serialized form changed. The lock is held for the whole
    /// cycle. Nothing is written when `f` fails.
    pub async fn update<R, D, F>(&self, default: D, f: F) -> BotResult<R>
    where
        D: FnOnce() -> T,
        F: FnOnce(&mut T) -> BotResult<R>,
    {
        let _guard = self.lock.lock().await;

        let (mut data, original) = match self.load_raw().await? {
            Some((data, raw)) => (data, Some(raw)),
            None => (default(), None),
        };

        let result = f(&mut data)?;

        let serialized = self.serialize(&data)?;
        if original.as_deref() != Some(serialized.as_str()) {
            self.write_atomic(&serialized).await?;
        }

        Ok(result)
    }

    async fn load_raw(&self) -> BotResult<Option<(T, String)>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                log_store_error("read", &self.path.display().to_string(), &e.to_string());
                return Err(BotError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data = serde_json::from_str(&content).map_err(|e| {
            log_store_error("parse", &self.path.display().to_string(), &e.to_string());
            BotError::Serialization {
                path: self.path.clone(),
                source: e,
            }
        })?;

        Ok(Some((data, content)))
    }

    async fn save(&self, data: &T) -> BotResult<()> {
        let serialized = self.serialize(data)?;
        self.write_atomic(&serialized).await
    }

    fn serialize(&self, data: &T) -> BotResult<String> {
        serde_json::to_string_pretty(data).map_err(|e| BotError::Serialization {
            path: self.path.clone(),
            source: e,
        })
    }

    async fn write_atomic(&self, content: &str) -> BotResult<()> {
        let io_err = |source: std::io::Error| {
            log_store_error("write", &self.path.display().to_string(), &source.to_string());
            BotError::Io {
                path: self.path.clone(),
                source,
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(io_err)?;
            }
        }

        let tmp_path = self.temp_path();
        let mut tmp_file = fs::File::create(&tmp_path).await.map_err(io_err)?;
        tmp_file.write_all(content.as_bytes()).await.map_err(io_err)?;
        tmp_file.sync_all().await.map_err(io_err)?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).await.map_err(io_err)?;

        log_store_operation(
            "write",
            &self.path.display().to_string(),
            Some(&format!("{} bytes", content.len())),
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let file: JsonFile<Vec<u32>> = JsonFile::new(dir.path().join("missing.json"));
        assert!(file.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_creates_file_and_returns_result() {
        let dir = tempdir().unwrap();
        let file: JsonFile<Vec<u32>> = JsonFile::new(dir.path().join("nested/numbers.json"));

        let len = file
            .update(Vec::new, |v| {
                v.push(7);
                Ok(v.len())
            })
            .await
            .unwrap();

        assert_eq!(len, 1);
        assert_eq!(file.read().await.unwrap(), Some(vec![7]));
        assert!(!dir.path().join("nested/numbers.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let file: JsonFile<Vec<u32>> = JsonFile::new(dir.path().join("numbers.json"));
        file.write(&vec![1, 2]).await.unwrap();

        let result: BotResult<()> = file
            .update(Vec::new, |v| {
                v.clear();
                Err(BotError::validation("nope"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(file.read().await.unwrap(), Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let file: JsonFile<Vec<u32>> = JsonFile::new(path);
        assert!(matches!(
            file.read().await,
            Err(BotError::Serialization { .. })
        ));
    }
}
