use std::path::PathBuf;

use crate::error::BotResult;
use crate::storage::json_file::JsonFile;

/// Persisted set of everyone who has talked to the bot; the broadcast audience.
pub struct UserDirectory {
    file: JsonFile<Vec<i64>>,
}

impl UserDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// Returns `true` when the user was not known before.
    pub async fn register(&self, user_id: i64) -> BotResult<bool> {
        self.file
            .update(Vec::new, |users| match users.binary_search(&user_id) {
                Ok(_) => Ok(false),
                Err(pos) => {
                    users.insert(pos, user_id);
                    Ok(true)
                }
            })
            .await
    }

    pub async fn all(&self) -> BotResult<Vec<i64>> {
        Ok(self.file.read().await?.unwrap_or_default())
    }

    pub async fn count(&self) -> BotResult<usize> {
        Ok(self.all().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_register_deduplicates_and_sorts() {
        let dir = tempdir().unwrap();
        let users = UserDirectory::new(dir.path().join("users.json"));

        assert!(users.register(42).await.unwrap());
        assert!(users.register(7).await.unwrap());
        assert!(!users.register(42).await.unwrap());

        assert_eq!(users.all().await.unwrap(), vec![7, 42]);
        assert_eq!(users.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_users_survive_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");

        UserDirectory::new(&path).register(1001).await.unwrap();
        let reopened = UserDirectory::new(&path);

        assert_eq!(reopened.all().await.unwrap(), vec![1001]);
    }
}
