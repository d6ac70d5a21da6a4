use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::state::ConversationState;

const SHARD_COUNT: usize = 16;

/// Raw session record: a state label and its free-form data.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSession {
    pub state: String,
    pub data: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    last_action_at: Instant,
    count: u32,
}

type Shard<V> = RwLock<HashMap<i64, V>>;

/// Per-user conversation state, the admin allow-list and the rate limiter.
///
/// Both tables are split into shards keyed by user ID, so operations on one
/// user are serialized while different users rarely wait on each other.
pub struct SessionStore {
    sessions: Vec<Shard<UserSession>>,
    rate_limits: Vec<Shard<RateLimitEntry>>,
    admins: HashSet<i64>,
}

impl SessionStore {
    /// Create an empty store with a fixed admin list
    pub fn new(admins: impl IntoIterator<Item = i64>) -> Self {
        Self {
            sessions: (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect(),
            rate_limits: (0..SHARD_COUNT).map(|_| RwLock::new(HashMap::new())).collect(),
            admins: admins.into_iter().collect(),
        }
    }

    fn shard<V>(shards: &[Shard<V>], user_id: i64) -> &Shard<V> {
        let index = user_id.rem_euclid(SHARD_COUNT as i64) as usize;
        &shards[index]
    }

    /// Set the state label and clear its data
    pub async fn set_state(&self, user_id: i64, state: &str) {
        self.set_state_data(user_id, state, "").await;
    }

    /// Replace the user's session
    pub async fn set_state_data(&self, user_id: i64, state: &str, data: &str) {
        let session = UserSession {
            state: state.to_string(),
            data: data.to_string(),
            updated_at: Utc::now(),
        };
        Self::shard(&self.sessions, user_id)
            .write()
            .await
            .insert(user_id, session);
        tracing::debug!("Session state for user {} set to '{}'", user_id, state);
    }

    /// Empty string when the user has no session.
    pub async fn get_state(&self, user_id: i64) -> String {
        self.get_state_data(user_id).await.0
    }

    /// `(state, data)`, both empty when the user has no session.
    pub async fn get_state_data(&self, user_id: i64) -> (String, String) {
        Self::shard(&self.sessions, user_id)
            .read()
            .await
            .get(&user_id)
            .map(|s| (s.state.clone(), s.data.clone()))
            .unwrap_or_default()
    }

    pub async fn get_session(&self, user_id: i64) -> Option<UserSession> {
        Self::shard(&self.sessions, user_id)
            .read()
            .await
            .get(&user_id)
            .cloned()
    }

    /// Remove the user's session
    pub async fn clear_state(&self, user_id: i64) {
        Self::shard(&self.sessions, user_id)
            .write()
            .await
            .remove(&user_id);
    }

    /// Decoded state; unrecognized labels come back as `Unknown`.
    pub async fn conversation_state(&self, user_id: i64) -> ConversationState {
        ConversationState::decode(&self.get_state(user_id).await)
    }

    /// Writing `Idle` clears the session.
    pub async fn set_conversation_state(&self, user_id: i64, state: &ConversationState) {
        match state {
            ConversationState::Idle => self.clear_state(user_id).await,
            other => self.set_state(user_id, &other.encode()).await,
        }
    }

    /// Check if a user is on the admin list
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id)
    }

    /// Check-and-record: the first action inside `window` passes, every later
    /// one is refused until `window` has elapsed since the last recorded action.
    pub async fn is_rate_limited(&self, user_id: i64, window: Duration) -> bool {
        let now = Instant::now();
        let mut shard = Self::shard(&self.rate_limits, user_id).write().await;

        match shard.entry(user_id) {
            Entry::Vacant(vacant) => {
                vacant.insert(RateLimitEntry {
                    last_action_at: now,
                    count: 1,
                });
                false
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if now.duration_since(entry.last_action_at) >= window {
                    entry.last_action_at = now;
                    entry.count = 1;
                    false
                } else {
                    entry.count = entry.count.saturating_add(1);
                    entry.count > 1
                }
            }
        }
    }

    /// Number of users with a session
    pub async fn session_count(&self) -> usize {
        let mut total = 0;
        for shard in &self.sessions {
            total += shard.read().await.len();
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_ids_map_to_a_shard() {
        let store = SessionStore::new([]);
        let _ = SessionStore::shard(&store.sessions, -1_001_234_567_890);
        let _ = SessionStore::shard(&store.sessions, i64::MIN);
    }

    #[tokio::test]
    async fn test_idle_clears_session() {
        let store = SessionStore::new([]);
        store.set_state(5, "chat").await;
        store.set_conversation_state(5, &ConversationState::Idle).await;
        assert!(store.get_session(5).await.is_none());
    }

    #[tokio::test]
    async fn test_session_count() {
        let store = SessionStore::new([]);
        for id in 0..40 {
            store.set_state(id, "chat").await;
        }
        store.clear_state(3).await;
        assert_eq!(store.session_count().await, 39);
    }
}
