//! Run-scoped user directory with memoized name lookups

use crate::metadata::types::{ResolvedUser, UserInfo};
use crate::slack::ConversationSource;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub api_calls: u64,
    pub api_errors: u64,
}

/// Resolves user ids to display names for one run.
///
/// Entries never expire: a directory lives as long as the run that created
/// it, so its size is bounded by the authors and mentions seen in that run.
/// Failed lookups are not cached.
pub struct UserDirectory {
    source: Arc<dyn ConversationSource>,
    users: DashMap<String, ResolvedUser>,
    stats: RwLock<CacheStats>,
}

impl UserDirectory {
    pub fn new(source: Arc<dyn ConversationSource>) -> Self {
        Self {
            source,
            users: DashMap::new(),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Display name for a user id. Never fails: falls back to a truncated id.
    pub async fn display_name(&self, user_id: &str) -> String {
        self.resolve(user_id).await.display_name
    }

    pub async fn resolve(&self, user_id: &str) -> ResolvedUser {
        let cached = self.users.get(user_id).map(|entry| entry.value().clone());
        if let Some(user) = cached {
            self.stats.write().await.hits += 1;
            tracing::trace!(user_id = %user_id, user = %user.display_name, "User cache hit");
            return user;
        }

        {
            let mut stats = self.stats.write().await;
            stats.misses += 1;
            stats.api_calls += 1;
        }
        tracing::debug!(user_id = %user_id, "User cache miss, fetching from Slack API");

        match self.source.resolve_user(user_id).await {
            Ok(info) => {
                let resolved = ResolvedUser::from_info(&info);
                tracing::debug!(
                    user_id = %user_id,
                    user = %resolved.display_name,
                    "Fetched and cached user"
                );
                self.users
                    .entry(user_id.to_string())
                    .or_insert(resolved)
                    .clone()
            }
            Err(e) => {
                self.stats.write().await.api_errors += 1;
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to fetch user info, using truncated ID"
                );
                ResolvedUser::fallback(user_id)
            }
        }
    }

    /// Resolve several ids, keeping the input order and skipping repeats
    pub async fn resolve_many(&self, user_ids: &[String]) -> Vec<ResolvedUser> {
        let mut resolved: Vec<ResolvedUser> = Vec::with_capacity(user_ids.len());
        for id in user_ids {
            if resolved.iter().any(|u| &u.id == id) {
                continue;
            }
            resolved.push(self.resolve(id).await);
        }
        resolved
    }

    /// Pre-resolve every workspace member with one bulk listing.
    ///
    /// Entries already memoized keep their first resolution. If the listing
    /// fails the current cache contents are returned and single lookups take
    /// over for anything missing.
    pub async fn resolve_workspace_map(&self) -> HashMap<String, String> {
        self.stats.write().await.api_calls += 1;

        match self.source.list_users().await {
            Ok(users) => {
                let total = users.len();
                for info in &users {
                    self.seed(info);
                }
                tracing::info!(users = total, "Workspace user map loaded");
            }
            Err(e) => {
                self.stats.write().await.api_errors += 1;
                tracing::warn!(error = %e, "Failed to list workspace users");
            }
        }

        self.users
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().display_name.clone()))
            .collect()
    }

    fn seed(&self, info: &UserInfo) {
        if info.id.is_empty() {
            return;
        }
        self.users
            .entry(info.id.clone())
            .or_insert_with(|| ResolvedUser::from_info(info));
    }

    pub async fn get_stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Log cache statistics at the end of a run
    pub async fn log_stats(&self) {
        let stats = self.get_stats().await;

        let hit_rate = if stats.hits + stats.misses > 0 {
            (stats.hits as f32 / (stats.hits + stats.misses) as f32 * 100.0) as u32
        } else {
            0
        };

        tracing::info!(
            users_cached = self.len(),
            hit_rate = hit_rate,
            api_calls = stats.api_calls,
            api_errors = stats.api_errors,
            "User directory statistics"
        );
    }
}
