//! A [`QueryStore`] wrapper that injects failures and delays, and records what it was asked.

#![allow(dead_code)]

use async_trait::async_trait;
use member_search::models::{Member, MemberTeamDto};
use member_search::query_builder::SelectQuery;
use member_search::store::{InMemoryStore, QueryStore};
use member_search::StoreError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct FaultyStore {
    inner: InMemoryStore,
    fail_content: bool,
    fail_count: bool,
    content_delay: Option<Duration>,
    count_delay: Option<Duration>,
    count_queries: Arc<Mutex<Vec<SelectQuery>>>,
    count_finished: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FaultyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn failing_content(mut self) -> Self {
        self.fail_content = true;
        self
    }

    pub fn failing_count(mut self) -> Self {
        self.fail_count = true;
        self
    }

    pub fn with_content_delay(mut self, delay: Duration) -> Self {
        self.content_delay = Some(delay);
        self
    }

    pub fn with_count_delay(mut self, delay: Duration) -> Self {
        self.count_delay = Some(delay);
        self
    }

    /// Queries received by `count`, in arrival order
    pub fn count_queries(&self) -> Vec<SelectQuery> {
        self.count_queries.lock().clone()
    }

    /// Whether any `count` call ran to completion
    pub fn count_finished(&self) -> bool {
        self.count_finished.load(Ordering::SeqCst)
    }

    /// Number of store calls started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn content_gate(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.content_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_content {
            return Err(StoreError::Unavailable("content replica down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QueryStore for FaultyStore {
    async fn fetch_member_teams(
        &self,
        query: &SelectQuery,
    ) -> Result<Vec<MemberTeamDto>, StoreError> {
        self.content_gate().await?;
        self.inner.fetch_member_teams(query).await
    }

    async fn fetch_members(&self, query: &SelectQuery) -> Result<Vec<Member>, StoreError> {
        self.content_gate().await?;
        self.inner.fetch_members(query).await
    }

    async fn count(&self, query: &SelectQuery) -> Result<u64, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.count_queries.lock().push(query.clone());
        if let Some(delay) = self.count_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_count {
            return Err(StoreError::Database("count query cancelled by server".to_string()));
        }
        let total = self.inner.count(query).await?;
        self.count_finished.store(true, Ordering::SeqCst);
        Ok(total)
    }

    async fn fetch_member_teams_with_count(
        &self,
        query: &SelectQuery,
    ) -> Result<(Vec<MemberTeamDto>, u64), StoreError> {
        self.content_gate().await?;
        if self.fail_count {
            return Err(StoreError::Database("window count failed".to_string()));
        }
        self.inner.fetch_member_teams_with_count(query).await
    }
}
