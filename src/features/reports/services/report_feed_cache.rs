use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::features::auth::Credential;
use crate::features::reports::models::Report;

/// Snapshot key; feeds are never shared between credentials
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FeedKey {
    credential: Credential,
    case_id: String,
}

struct CachedFeed {
    reports: Vec<Report>,
    fetched_at: Instant,
}

/// Short-lived per-case report feed snapshots
pub struct ReportFeedCache {
    ttl: Duration,
    feeds: RwLock<HashMap<FeedKey, CachedFeed>>,
}

impl ReportFeedCache {
    /// A zero `ttl` disables caching entirely
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            feeds: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, credential: &Credential, case_id: &str) -> Option<Vec<Report>> {
        if !self.is_enabled() {
            return None;
        }

        let feeds = self.feeds.read().await;
        let cached = feeds.get(&key(credential, case_id))?;
        if cached.fetched_at.elapsed() >= self.ttl {
            return None;
        }

        tracing::debug!(
            "Serving cached report feed for case {} ({} reports)",
            case_id,
            cached.reports.len()
        );
        Some(cached.reports.clone())
    }

    /// Replace the snapshot for a case, dropping any expired entries
    pub async fn store(&self, credential: &Credential, case_id: &str, reports: &[Report]) {
        if !self.is_enabled() {
            return;
        }

        let mut feeds = self.feeds.write().await;
        let ttl = self.ttl;
        feeds.retain(|_, feed| feed.fetched_at.elapsed() < ttl);
        feeds.insert(
            key(credential, case_id),
            CachedFeed {
                reports: reports.to_vec(),
                fetched_at: Instant::now(),
            },
        );
    }

    /// Put a freshly created report at the head of a live snapshot.
    ///
    /// Returns `false` when there is no live snapshot to update.
    pub async fn prepend(&self, credential: &Credential, case_id: &str, report: Report) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let mut feeds = self.feeds.write().await;
        match feeds.get_mut(&key(credential, case_id)) {
            Some(feed) if feed.fetched_at.elapsed() < self.ttl => {
                feed.reports.insert(0, report);
                true
            }
            _ => false,
        }
    }
}

fn key(credential: &Credential, case_id: &str) -> FeedKey {
    FeedKey {
        credential: credential.clone(),
        case_id: case_id.to_string(),
    }
}
