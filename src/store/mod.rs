//! # Storage Collaborators
//!
//! The search engine talks to storage only through [`QueryStore`]. A store receives a
//! declarative [`SelectQuery`] and decides how to execute it.
//!
//! Every call is independent: an implementation acquires whatever connection or lock
//! it needs for that call and releases it before returning, on success and failure
//! alike. Nothing is held between calls, so one store value can serve concurrent
//! searches.
//!
//! - [`InMemoryStore`] evaluates queries over in-process tables. Content and count of
//!   a combined fetch are read under one lock, so they always agree.
//! - [`PgQueryStore`] renders queries with `sqlx::QueryBuilder`, binding every value.

pub mod memory;
pub mod postgres;

use crate::error::StoreError;
use crate::models::{Member, MemberTeamDto};
use crate::query_builder::{Projection, SelectQuery};
use async_trait::async_trait;
use std::sync::Arc;

pub use memory::InMemoryStore;
pub use postgres::PgQueryStore;

/// Read primitives a storage layer must offer to the search engine
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Rows of a `Projection::MemberTeam` query
    async fn fetch_member_teams(&self, query: &SelectQuery)
        -> Result<Vec<MemberTeamDto>, StoreError>;

    /// Rows of a `Projection::Member` query
    async fn fetch_members(&self, query: &SelectQuery) -> Result<Vec<Member>, StoreError>;

    /// Number of rows matching the query, ignoring any order or window
    async fn count(&self, query: &SelectQuery) -> Result<u64, StoreError>;

    /// Windowed rows plus the unwindowed total, taken from one consistent read
    async fn fetch_member_teams_with_count(
        &self,
        query: &SelectQuery,
    ) -> Result<(Vec<MemberTeamDto>, u64), StoreError>;
}

#[async_trait]
impl<S: QueryStore + ?Sized> QueryStore for Arc<S> {
    async fn fetch_member_teams(
        &self,
        query: &SelectQuery,
    ) -> Result<Vec<MemberTeamDto>, StoreError> {
        (**self).fetch_member_teams(query).await
    }

    async fn fetch_members(&self, query: &SelectQuery) -> Result<Vec<Member>, StoreError> {
        (**self).fetch_members(query).await
    }

    async fn count(&self, query: &SelectQuery) -> Result<u64, StoreError> {
        (**self).count(query).await
    }

    async fn fetch_member_teams_with_count(
        &self,
        query: &SelectQuery,
    ) -> Result<(Vec<MemberTeamDto>, u64), StoreError> {
        (**self).fetch_member_teams_with_count(query).await
    }
}

/// Reject a fetch whose projection does not match the row type it decodes into
pub(crate) fn expect_projection(query: &SelectQuery, expected: Projection) -> Result<(), StoreError> {
    if query.projection() == expected {
        Ok(())
    } else {
        Err(StoreError::InvalidQuery(format!(
            "expected {expected:?} projection, got {:?}",
            query.projection()
        )))
    }
}
