//! # PostgreSQL Store
//!
//! Renders a [`SelectQuery`] with `sqlx::QueryBuilder`. Table, column and join text come
//! only from the fixed entity and field definitions; every value is bound with
//! `push_bind`.

use super::{expect_projection, QueryStore};
use crate::config::SearchConfig;
use crate::error::StoreError;
use crate::models::{Member, MemberTeamDto};
use crate::query_builder::{Projection, SelectQuery, Value, WhereClause};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;

/// sqlx-backed store. Each call checks a connection out of the pool and returns it on drop.
#[derive(Debug, Clone)]
pub struct PgQueryStore {
    pool: PgPool,
}

impl PgQueryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized and timed from configuration
    pub async fn connect(config: &SearchConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Projected, filtered, ordered and windowed SELECT. With `with_total`, every row
    /// also carries the unwindowed row count as `total_count`.
    pub fn select_statement(query: &SelectQuery, with_total: bool) -> QueryBuilder<'static, Postgres> {
        let mut statement = QueryBuilder::new("SELECT ");
        let columns: Vec<String> = query
            .projection()
            .fields()
            .iter()
            .map(|field| format!("{} AS {}", field.column(), field.output_name()))
            .collect();
        statement.push(columns.join(", "));
        if with_total {
            statement.push(", COUNT(*) OVER () AS total_count");
        }
        push_from_and_filter(&mut statement, query);

        if !query.orders().is_empty() {
            let orders: Vec<String> = query.orders().iter().map(|o| o.to_sql()).collect();
            statement.push(" ORDER BY ");
            statement.push(orders.join(", "));
        }

        let (offset, limit) = query.window();
        if let Some(limit) = limit {
            statement.push(" LIMIT ");
            statement.push_bind(to_bigint(limit));
        }
        if let Some(offset) = offset {
            statement.push(" OFFSET ");
            statement.push_bind(to_bigint(offset));
        }
        statement
    }

    /// `SELECT COUNT(*)` over the query's joins and filter
    pub fn count_statement(query: &SelectQuery) -> QueryBuilder<'static, Postgres> {
        let mut statement = QueryBuilder::new("SELECT COUNT(*)");
        push_from_and_filter(&mut statement, query);
        statement
    }
}

#[async_trait]
impl QueryStore for PgQueryStore {
    async fn fetch_member_teams(
        &self,
        query: &SelectQuery,
    ) -> Result<Vec<MemberTeamDto>, StoreError> {
        expect_projection(query, Projection::MemberTeam)?;
        let mut statement = Self::select_statement(query, false);
        debug!(sql = statement.sql(), "fetching member rows");
        let rows = statement
            .build_query_as::<MemberTeamDto>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_members(&self, query: &SelectQuery) -> Result<Vec<Member>, StoreError> {
        expect_projection(query, Projection::Member)?;
        let mut statement = Self::select_statement(query, false);
        debug!(sql = statement.sql(), "fetching member entities");
        let rows = statement
            .build_query_as::<Member>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count(&self, query: &SelectQuery) -> Result<u64, StoreError> {
        let mut statement = Self::count_statement(&query.count_query());
        debug!(sql = statement.sql(), "counting member rows");
        let total: i64 = statement
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(total))
    }

    async fn fetch_member_teams_with_count(
        &self,
        query: &SelectQuery,
    ) -> Result<(Vec<MemberTeamDto>, u64), StoreError> {
        expect_projection(query, Projection::MemberTeam)?;
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let mut statement = Self::select_statement(query, true);
        debug!(sql = statement.sql(), "fetching member rows with total");
        let rows: Vec<PgRow> = statement.build().fetch_all(&mut *tx).await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total_count")?,
            // a window past the end returns no rows to read the total from
            None if query.window().0.unwrap_or(0) > 0 => {
                let mut count = Self::count_statement(&query.count_query());
                count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?
            }
            None => 0,
        };
        let content = rows
            .iter()
            .map(MemberTeamDto::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit().await?;

        Ok((content, to_count(total)))
    }
}

fn push_from_and_filter(statement: &mut QueryBuilder<'static, Postgres>, query: &SelectQuery) {
    statement.push(" FROM ");
    statement.push(query.source().table_ref());
    for join in query.joins() {
        statement.push(" ");
        statement.push(join.to_sql());
    }
    push_where(statement, query.where_clause());
}

fn push_where(statement: &mut QueryBuilder<'static, Postgres>, clause: &WhereClause) {
    for (index, condition) in clause.conditions().iter().enumerate() {
        statement.push(if index == 0 { " WHERE " } else { " AND " });
        statement.push(condition.field.column());
        statement.push(" ");
        statement.push(condition.operator.to_sql());
        statement.push(" ");
        match &condition.value {
            Value::Int(value) => statement.push_bind(*value),
            Value::Text(value) => statement.push_bind(value.clone()),
        };
    }
}

fn to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_count(total: i64) -> u64 {
    u64::try_from(total).unwrap_or(0)
}
