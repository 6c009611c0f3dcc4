//! Session registry: conversation id → accumulated history.
//!
//! In-memory only, unbounded, process-lifetime. Entries are created
//! lazily on first reference. Each entry carries its own mutex; callers
//! hold it across a full read-run-store cycle, which serializes
//! concurrent connections that share a conversation id (duplicate tabs)
//! and prevents lost updates.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use confab_core::turns::ConversationHistory;

/// Shared handle to one conversation's history.
pub type ConversationEntry = Arc<Mutex<ConversationHistory>>;

/// Maps conversation ids to their histories.
pub struct SessionRegistry {
    conversations: RwLock<HashMap<String, ConversationEntry>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Get the entry for `id`, creating it (empty) on first reference.
    ///
    /// Lock the returned entry for the whole get-run-put cycle.
    pub async fn conversation(&self, id: &str) -> ConversationEntry {
        // Fast path: the entry already exists.
        {
            let map = self.conversations.read().await;
            if let Some(entry) = map.get(id) {
                return Arc::clone(entry);
            }
        }
        let mut map = self.conversations.write().await;
        Arc::clone(map.entry(id.to_owned()).or_default())
    }

    /// Snapshot of the history for `id`; empty if unseen.
    pub async fn get(&self, id: &str) -> ConversationHistory {
        self.conversation(id).await.lock().await.clone()
    }

    /// Replace the history for `id`.
    pub async fn put(&self, id: &str, history: ConversationHistory) {
        *self.conversation(id).await.lock().await = history;
    }

    /// Number of conversations seen so far.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Whether no conversation has been seen yet.
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use confab_core::turns::ConversationTurn;

    #[tokio::test]
    async fn unseen_id_yields_empty_history() {
        let registry = SessionRegistry::new();
        assert!(registry.get("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let registry = SessionRegistry::new();
        let history = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("hello"),
        ];
        registry.put("u1", history.clone()).await;
        assert_eq!(registry.get("u1").await, history);
    }

    #[tokio::test]
    async fn ids_are_independent() {
        let registry = SessionRegistry::new();
        registry.put("a", vec![ConversationTurn::user("a")]).await;
        registry.put("b", vec![ConversationTurn::user("b")]).await;
        assert_eq!(registry.get("a").await[0].content, "a");
        assert_eq!(registry.get("b").await[0].content, "b");
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn lazy_creation_counts_reads() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty().await);
        let _ = registry.get("u1").await;
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn entry_handle_is_shared() {
        let registry = SessionRegistry::new();
        let first = registry.conversation("u1").await;
        let second = registry.conversation("u1").await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn per_id_lock_serializes_read_modify_write() {
        // Two tasks race full read-modify-write cycles on the same id.
        // Holding the entry mutex across the cycle must prevent lost
        // updates: the final history has every appended turn.
        let registry = Arc::new(SessionRegistry::new());
        let mut tasks = Vec::new();
        for i in 0..8 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                let entry = registry.conversation("shared").await;
                let mut history = entry.lock().await;
                let snapshot_len = history.len();
                tokio::task::yield_now().await;
                history.push(ConversationTurn::user(format!("turn {i}")));
                assert_eq!(history.len(), snapshot_len + 1);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(registry.get("shared").await.len(), 8);
    }
}
