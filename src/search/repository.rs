//! # Member Search Repository
//!
//! Runs composed member predicates against a [`QueryStore`] and assembles pages.
//!
//! Every query starts from `member LEFT JOIN team`, so members without a team are
//! always part of the candidate set. Paged searches resolve the total through a
//! [`CountStrategy`]:
//!
//! - `Coupled` asks the store for content and total in one consistent read.
//! - `Decoupled` runs the content query and a slimmer count query concurrently. The
//!   count drops ordering, the window and any team join no filter needs. The two reads
//!   are not taken from one snapshot, so under concurrent writes the total is only
//!   approximately consistent with the content.
//!
//! A configured timeout bounds the whole call. When it fires, or either sub-query
//! fails, the sibling query is dropped and the call fails as a unit.

use crate::config::SearchConfig;
use crate::error::{QueryKind, Result, SearchError};
use crate::logging::{log_error, log_query_operation};
use crate::models::{Member, MemberTeamDto};
use crate::query_builder::{
    Entity, MemberScopes, Page, PageRequest, Projection, Relation, SelectQuery,
};
use crate::search::MemberSearchCondition;
use crate::store::QueryStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

const SEARCH: &str = "search";
const SEARCH_BY_BUILDER: &str = "search_by_builder";
const SEARCH_PAGE: &str = "search_page";
const FIND_MEMBERS: &str = "find_members";
const COUNT: &str = "count";
const EXISTS: &str = "exists";

/// How a paged search resolves `total_elements`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountStrategy {
    /// Content and total from one store round-trip
    #[default]
    Coupled,
    /// Content and a separately optimized count query, issued concurrently
    Decoupled,
}

impl CountStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountStrategy::Coupled => "coupled",
            CountStrategy::Decoupled => "decoupled",
        }
    }
}

impl fmt::Display for CountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member search over any [`QueryStore`].
///
/// Holds no per-request state; one repository can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct MemberSearchRepository<S> {
    store: S,
    query_timeout: Option<Duration>,
    max_page_size: u64,
    default_count_strategy: CountStrategy,
}

impl<S: QueryStore> MemberSearchRepository<S> {
    /// Repository with default limits (see [`SearchConfig::default`])
    pub fn new(store: S) -> Self {
        Self::with_config(store, &SearchConfig::default())
    }

    pub fn with_config(store: S, config: &SearchConfig) -> Self {
        Self {
            store,
            query_timeout: config.query_timeout(),
            max_page_size: config.max_page_size,
            default_count_strategy: config.default_count_strategy,
        }
    }

    /// Replace the per-call timeout; `None` disables it
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn default_count_strategy(&self) -> CountStrategy {
        self.default_count_strategy
    }

    /// Unpaged search, filter built from the per-field fragment list
    #[instrument(skip(self))]
    pub async fn search(&self, condition: &MemberSearchCondition) -> Result<Vec<MemberTeamDto>> {
        let fragments = MemberScopes::fragments(condition);
        debug!(
            active = fragments.iter().filter(|f| !f.is_noop()).count(),
            "searching members"
        );
        let query = base_query(Projection::MemberTeam).where_all(fragments);
        self.fetch_content(SEARCH, &query).await
    }

    /// Unpaged search, filter built by accumulating into an always-true clause.
    /// Returns the same rows as [`MemberSearchRepository::search`].
    #[instrument(skip(self))]
    pub async fn search_by_builder(
        &self,
        condition: &MemberSearchCondition,
    ) -> Result<Vec<MemberTeamDto>> {
        let query = base_query(Projection::MemberTeam).filter(MemberScopes::accumulate(condition));
        self.fetch_content(SEARCH_BY_BUILDER, &query).await
    }

    /// Member entities (not the joined row shape) matching the same fragments
    #[instrument(skip(self))]
    pub async fn find_members(&self, condition: &MemberSearchCondition) -> Result<Vec<Member>> {
        let query = base_query(Projection::Member).where_all(MemberScopes::fragments(condition));
        let store = &self.store;
        self.with_timeout(FIND_MEMBERS, async {
            store
                .fetch_members(&query)
                .await
                .map_err(|e| SearchError::storage(FIND_MEMBERS, QueryKind::Content, e))
        })
        .await
    }

    /// Number of matching members. The team join is only kept when a team filter needs it.
    #[instrument(skip(self))]
    pub async fn count(&self, condition: &MemberSearchCondition) -> Result<u64> {
        let query = count_query_for(condition);
        let store = &self.store;
        self.with_timeout(COUNT, async {
            store
                .count(&query)
                .await
                .map_err(|e| SearchError::storage(COUNT, QueryKind::Count, e))
        })
        .await
    }

    /// Whether at least one member matches, fetching a single row without a total
    #[instrument(skip(self))]
    pub async fn exists(&self, condition: &MemberSearchCondition) -> Result<bool> {
        let query = base_query(Projection::Member)
            .where_all(MemberScopes::fragments(condition))
            .without_unreferenced_joins()
            .limit(1);
        let store = &self.store;
        self.with_timeout(EXISTS, async {
            store
                .fetch_members(&query)
                .await
                .map(|rows| !rows.is_empty())
                .map_err(|e| SearchError::storage(EXISTS, QueryKind::Existence, e))
        })
        .await
    }

    /// One page of matching rows plus the total size of the filtered set
    #[instrument(skip(self), fields(offset = page.offset(), limit = page.limit()))]
    pub async fn search_page(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
        strategy: CountStrategy,
    ) -> Result<Page<MemberTeamDto>> {
        self.check_page_size(page)?;

        let started = Instant::now();
        let query = base_query(Projection::MemberTeam)
            .where_all(MemberScopes::fragments(condition))
            .page(page);

        let result = self
            .with_timeout(SEARCH_PAGE, async {
                match strategy {
                    CountStrategy::Coupled => self.fetch_coupled(&query).await,
                    CountStrategy::Decoupled => self.fetch_decoupled(&query).await,
                }
            })
            .await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok((content, total)) => {
                let page = Page::new(content, page, total);
                log_query_operation(
                    SEARCH_PAGE,
                    Some(strategy.as_str()),
                    "ok",
                    page.number_of_elements(),
                    Some(page.total_elements()),
                    duration_ms,
                );
                Ok(page)
            }
            Err(err) => {
                log_error("member_search", SEARCH_PAGE, &err.to_string(), Some(strategy.as_str()));
                Err(err)
            }
        }
    }

    /// Paged search using the configured default count strategy
    pub async fn search_page_default(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
    ) -> Result<Page<MemberTeamDto>> {
        self.search_page(condition, page, self.default_count_strategy)
            .await
    }

    /// Paged search with the coupled count
    pub async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
    ) -> Result<Page<MemberTeamDto>> {
        self.search_page(condition, page, CountStrategy::Coupled).await
    }

    /// Paged search with the decoupled count
    pub async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
    ) -> Result<Page<MemberTeamDto>> {
        self.search_page(condition, page, CountStrategy::Decoupled).await
    }

    fn check_page_size(&self, page: &PageRequest) -> Result<()> {
        if page.limit() > self.max_page_size {
            return Err(SearchError::ValidationError(format!(
                "limit {} exceeds the maximum page size of {}",
                page.limit(),
                self.max_page_size
            )));
        }
        Ok(())
    }

    async fn fetch_content(
        &self,
        operation: &'static str,
        query: &SelectQuery,
    ) -> Result<Vec<MemberTeamDto>> {
        let store = &self.store;
        self.with_timeout(operation, async {
            store
                .fetch_member_teams(query)
                .await
                .map_err(|e| SearchError::storage(operation, QueryKind::Content, e))
        })
        .await
    }

    async fn fetch_coupled(&self, query: &SelectQuery) -> Result<(Vec<MemberTeamDto>, u64)> {
        self.store
            .fetch_member_teams_with_count(query)
            .await
            .map_err(|e| SearchError::storage(SEARCH_PAGE, QueryKind::ContentWithCount, e))
    }

    async fn fetch_decoupled(&self, query: &SelectQuery) -> Result<(Vec<MemberTeamDto>, u64)> {
        let count_query = query.count_query().without_unreferenced_joins();
        debug!(
            content_joins = query.joins().len(),
            count_joins = count_query.joins().len(),
            "issuing decoupled content and count queries"
        );

        let content = async {
            self.store
                .fetch_member_teams(query)
                .await
                .map_err(|e| SearchError::storage(SEARCH_PAGE, QueryKind::Content, e))
        };
        let count = async {
            self.store
                .count(&count_query)
                .await
                .map_err(|e| SearchError::storage(SEARCH_PAGE, QueryKind::Count, e))
        };
        tokio::try_join!(content, count)
    }

    async fn with_timeout<T, F>(&self, operation: &'static str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .map_err(|_| SearchError::Timeout {
                    operation,
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })?,
            None => future.await,
        }
    }
}

/// `member m LEFT JOIN team t` with the given projection
fn base_query(projection: Projection) -> SelectQuery {
    SelectQuery::from(Entity::Member)
        .select(projection)
        .left_join(Relation::MemberTeam)
}

fn count_query_for(condition: &MemberSearchCondition) -> SelectQuery {
    base_query(Projection::MemberTeam)
        .where_all(MemberScopes::fragments(condition))
        .count_query()
        .without_unreferenced_joins()
}
